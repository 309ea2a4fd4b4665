//! Data directory health check.

use std::path::Path;

use tracing::{error, info};

use super::{CommandError, DataDir};

/// Record counts of a data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub users: usize,
    pub watches: usize,
    pub admins: usize,
}

/// Load every data file and log how many records each holds.
///
/// Missing files count as empty.
///
/// # Errors
///
/// Returns the first load error (unreadable or corrupt file). All files are
/// checked and logged before returning.
pub async fn run(data_dir: &Path) -> Result<Counts, CommandError> {
    let data = DataDir::open(data_dir);

    let users = data.users.load().await.map(|r| r.len());
    let watches = data.watches.load().await.map(|r| r.len());
    let admins = data.admins.load().await.map(|r| r.len());

    for (path, result) in [
        (data.users.path(), &users),
        (data.watches.path(), &watches),
        (data.admins.path(), &admins),
    ] {
        match result {
            Ok(count) => info!(path = %path.display(), records = count, "OK"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed to load"),
        }
    }

    Ok(Counts {
        users: users?,
        watches: watches?,
        admins: admins?,
    })
}
