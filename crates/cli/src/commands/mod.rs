//! Subcommand implementations.
//!
//! Each command opens its own stores on the data directory; the server may
//! be running at the same time, but writes from both sides are not
//! coordinated across processes.

pub mod admin;
pub mod check;
pub mod seed;
pub mod user;

use std::path::Path;

use thiserror::Error;

use watchshop_storefront::db::{ADMINS_FILE, JsonStore, RepositoryError, USERS_FILE, WATCHES_FILE};
use watchshop_storefront::models::{AdminRecord, UserRecord, WatchRecord};
use watchshop_storefront::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Account operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Reading or writing a data file failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Reading an input file failed.
    #[error("Failed to read {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not valid YAML for the expected shape.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The seed file parsed but has invalid entries.
    #[error("{0} validation errors found")]
    Validation(usize),
}

/// The three stores of a data directory.
pub struct DataDir {
    pub users: JsonStore<UserRecord>,
    pub watches: JsonStore<WatchRecord>,
    pub admins: JsonStore<AdminRecord>,
}

impl DataDir {
    /// Point stores at `dir`; nothing is read yet.
    pub fn open(dir: &Path) -> Self {
        Self {
            users: JsonStore::new(dir.join(USERS_FILE)),
            watches: JsonStore::new(dir.join(WATCHES_FILE)),
            admins: JsonStore::new(dir.join(ADMINS_FILE)),
        }
    }
}
