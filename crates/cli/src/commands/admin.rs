//! Admin credential commands.
//!
//! # Usage
//!
//! ```bash
//! ws-cli admin create -u admin@example.com -p 'correct horse'
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use watchshop_storefront::services::AuthService;

use super::{CommandError, DataDir};

/// Append a hashed admin record to `admins.json`.
///
/// # Errors
///
/// Returns an error if the username is invalid or already listed, or if the
/// file cannot be read or written.
pub async fn create(
    data_dir: &Path,
    username: &str,
    password: &SecretString,
) -> Result<(), CommandError> {
    let data = DataDir::open(data_dir);

    AuthService::new(&data.users, &data.admins)
        .create_admin(username, password.expose_secret())
        .await?;

    tracing::info!(username, path = %data.admins.path().display(), "Admin created");
    Ok(())
}
