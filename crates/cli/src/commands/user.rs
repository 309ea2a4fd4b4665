//! Site user commands.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use watchshop_storefront::models::Address;
use watchshop_storefront::services::AuthService;

use super::{CommandError, DataDir};

/// Register a user. Unlike `/register`, this can grant admin rights.
///
/// # Errors
///
/// Returns an error if the username is invalid or taken, or if `users.json`
/// cannot be read or written.
pub async fn create(
    data_dir: &Path,
    username: &str,
    password: &SecretString,
    is_admin: bool,
) -> Result<(), CommandError> {
    let data = DataDir::open(data_dir);

    let user = AuthService::new(&data.users, &data.admins)
        .register_with_password(username, password.expose_secret(), Address::default(), is_admin)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, is_admin, "User created");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_admin_user() {
        let dir = tempfile::tempdir().unwrap();

        create(dir.path(), "Boss", &SecretString::from("pw"), true)
            .await
            .unwrap();

        let users = DataDir::open(dir.path()).users.load().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username.as_str(), "boss");
        assert!(users[0].is_admin);
    }
}
