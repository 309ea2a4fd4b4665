//! File-backed record storage.
//!
//! # Data directory
//!
//! Every collection lives in its own JSON file holding a top-level array:
//!
//! - `users.json` - Site accounts (username, password hash, address)
//! - `watches.json` - The product catalog
//! - `admins.json` - Admin credentials (written only by `ws-cli`)
//!
//! Id-keyed collections also keep a hidden sequence sidecar
//! (`.users.json.seq`, `.watches.json.seq`) so ids are never reused after a
//! deletion.
//!
//! # Consistency
//!
//! There is no cache: each operation reads the whole file. Mutations run
//! load → mutate → save under a per-store mutex and replace the file with an
//! atomic rename, so concurrent requests cannot lose each other's writes and
//! a crash mid-save leaves the previous version intact.

pub mod admins;
pub mod users;
pub mod watches;

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub use admins::AdminRepository;
pub use users::UserRepository;
pub use watches::WatchRepository;

/// File name of the users collection inside the data directory.
pub const USERS_FILE: &str = "users.json";

/// File name of the watches collection inside the data directory.
pub const WATCHES_FILE: &str = "watches.json";

/// File name of the admins collection inside the data directory.
pub const ADMINS_FILE: &str = "admins.json";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing a data file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file exists but does not hold the expected records.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A record with an integer primary key.
pub trait Identified {
    /// The record's id as stored on disk.
    fn id(&self) -> i32;
}

/// Persisted id sequence for a collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Sequence {
    next_id: i32,
}

/// One JSON file holding an ordered collection of `T`.
///
/// Cheap to construct; share it (e.g. through `AppState`) so that all
/// writers of a file go through the same mutex.
pub struct JsonStore<T> {
    path: PathBuf,
    sequence_path: PathBuf,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for JsonStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a store backed by `path`. The file is not touched until the
    /// first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let sequence_path = sidecar_path(&path, "seq");

        Self {
            path,
            sequence_path,
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record.
    ///
    /// A missing (or blank) file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read and
    /// `RepositoryError::DataCorruption` if it is not a JSON array of `T`.
    pub async fn load(&self) -> Result<Vec<T>, RepositoryError> {
        read_records(&self.path).await
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be written.
    pub async fn save(&self, records: &[T]) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        write_records(&self.path, records).await
    }

    /// Run a read-modify-write cycle while holding the store's write lock.
    ///
    /// The closure sees the freshly loaded table. The file is rewritten only
    /// when the closure returns `Ok` and touched the records; an `Err` leaves
    /// the file untouched.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `RepositoryError` (converted into
    /// `E`) if loading or saving fails.
    pub async fn update<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Table<T>) -> Result<R, E>,
        E: From<RepositoryError>,
    {
        let _guard = self.write_lock.lock().await;

        let records = read_records(&self.path).await?;
        let next_id = read_sequence(&self.sequence_path).await?;
        let mut table = Table {
            records,
            next_id,
            records_changed: false,
            sequence_changed: false,
        };

        let output = f(&mut table)?;

        // Sequence first: a crash in between leaves a gap, never a reused id.
        if table.sequence_changed
            && let Some(next_id) = table.next_id
        {
            write_sequence(&self.sequence_path, next_id).await?;
        }
        if table.records_changed {
            write_records(&self.path, &table.records).await?;
        }

        Ok(output)
    }
}

/// In-memory view of a collection during [`JsonStore::update`].
#[derive(Debug)]
pub struct Table<T> {
    records: Vec<T>,
    next_id: Option<i32>,
    records_changed: bool,
    sequence_changed: bool,
}

impl<T> Table<T> {
    /// All records, in file order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Mutable access to the records; marks the table for saving.
    pub fn records_mut(&mut self) -> &mut Vec<T> {
        self.records_changed = true;
        &mut self.records
    }

    /// Append a record.
    pub fn push(&mut self, record: T) {
        self.records_mut().push(record);
    }

    /// Index of the first record matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.records.iter().position(predicate)
    }

    /// First record matching `predicate`, mutably. Marks the table for saving
    /// only when a record is found.
    pub fn find_mut(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<&mut T> {
        let index = self.position(predicate)?;
        self.records_mut().get_mut(index)
    }

    /// Remove and return the first record matching `predicate`.
    pub fn remove_first(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let index = self.position(predicate)?;
        Some(self.records_mut().remove(index))
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records_mut().clear();
    }
}

impl<T: Identified> Table<T> {
    /// Allocate the next id.
    ///
    /// Never returns an id that is in use or was handed out before, even if
    /// the record holding it was deleted. Files written before the sequence
    /// sidecar existed continue from their highest id.
    pub fn allocate_id(&mut self) -> i32 {
        let floor = self
            .records
            .iter()
            .map(Identified::id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let id = self.next_id.map_or(floor, |next| next.max(floor));

        self.next_id = Some(id.saturating_add(1));
        self.sequence_changed = true;
        id
    }
}

/// Sibling path `.<file name>.<suffix>` next to `path`.
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("records");
    path.with_file_name(format!(".{file_name}.{suffix}"))
}

async fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, RepositoryError> {
    let Some(bytes) = read_optional(path).await? else {
        return Ok(Vec::new());
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Data file is not a valid record array");
        RepositoryError::DataCorruption(format!("{}: {e}", path.display()))
    })
}

async fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), RepositoryError> {
    let bytes = serde_json::to_vec_pretty(records).map_err(|e| {
        RepositoryError::DataCorruption(format!("failed to serialize {}: {e}", path.display()))
    })?;

    write_atomic(path, &bytes).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to write data file");
        RepositoryError::Io(e)
    })
}

async fn read_sequence(path: &Path) -> Result<Option<i32>, RepositoryError> {
    let Some(bytes) = read_optional(path).await? else {
        return Ok(None);
    };

    let sequence: Sequence = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Id sequence file is corrupt");
        RepositoryError::DataCorruption(format!("{}: {e}", path.display()))
    })?;

    Ok(Some(sequence.next_id))
}

async fn write_sequence(path: &Path, next_id: i32) -> Result<(), RepositoryError> {
    let bytes = serde_json::to_vec(&Sequence { next_id }).map_err(|e| {
        RepositoryError::DataCorruption(format!("failed to serialize sequence: {e}"))
    })?;

    write_atomic(path, &bytes).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to write id sequence");
        RepositoryError::Io(e)
    })
}

/// Read a file, treating "does not exist" and blank content as `None`.
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, RepositoryError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read data file");
            Err(RepositoryError::Io(e))
        }
    }
}

/// Write `bytes` to a temp file beside `path`, fsync it, then rename it over
/// `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = sidecar_path(path, &format!("tmp.{}", std::process::id()));

    let written = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
