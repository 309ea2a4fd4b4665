//! Account service.
//!
//! Every operation first checks that the session belongs to the target user
//! and only then looks the user up, so an unauthorized caller cannot probe
//! which ids exist.

use watchshop_core::{UserId, Username};

use super::auth::{AuthError, hash_password};
use crate::db::{JsonStore, UserRepository};
use crate::models::session::SessionState;
use crate::models::user::{Address, UserProfile, UserRecord};

/// Session-gated operations on a user's own account.
pub struct AccountService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(users: &'a JsonStore<UserRecord>) -> Self {
        Self {
            users: UserRepository::new(users),
        }
    }

    /// Fetch the target user's current record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the session is not the target user.
    /// Returns `AuthError::UserNotFound` if the record no longer exists.
    pub async fn get(&self, session: &SessionState, id: UserId) -> Result<UserProfile, AuthError> {
        session.authorize(id)?;

        self.users
            .get_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }

    /// Change the username (the account email).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized`, `AuthError::InvalidUsername`,
    /// `AuthError::DuplicateUsername` or `AuthError::UserNotFound`.
    pub async fn update_email(
        &self,
        session: &SessionState,
        id: UserId,
        email: &str,
    ) -> Result<UserProfile, AuthError> {
        session.authorize(id)?;
        let username = Username::parse(email)?;

        let user = self
            .users
            .set_username(id, username)
            .await
            .map_err(AuthError::from_user_repository)?;

        tracing::info!(user_id = %id, "Email updated");
        Ok(user.into())
    }

    /// Replace the password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized`, `AuthError::WeakPassword` or
    /// `AuthError::UserNotFound`.
    pub async fn update_password(
        &self,
        session: &SessionState,
        id: UserId,
        password: &str,
    ) -> Result<(), AuthError> {
        session.authorize(id)?;
        if password.is_empty() {
            return Err(AuthError::WeakPassword(
                "password cannot be empty".to_owned(),
            ));
        }
        let password_hash = hash_password(password)?;

        self.users
            .set_password_hash(id, password_hash)
            .await
            .map_err(AuthError::from_user_repository)?;

        tracing::info!(user_id = %id, "Password updated");
        Ok(())
    }

    /// Replace all address fields.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` or `AuthError::UserNotFound`.
    pub async fn update_address(
        &self,
        session: &SessionState,
        id: UserId,
        address: Address,
    ) -> Result<UserProfile, AuthError> {
        session.authorize(id)?;

        let user = self
            .users
            .set_address(id, address)
            .await
            .map_err(AuthError::from_user_repository)?;

        Ok(user.into())
    }

    /// Delete the account. The caller must end the session afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` or `AuthError::UserNotFound`.
    pub async fn remove(&self, session: &SessionState, id: UserId) -> Result<(), AuthError> {
        session.authorize(id)?;

        self.users
            .delete(id)
            .await
            .map_err(AuthError::from_user_repository)?;

        tracing::info!(user_id = %id, "Account removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::auth::AuthService;

    async fn registered(
        users: &JsonStore<UserRecord>,
        admins: &JsonStore<crate::models::AdminRecord>,
        name: &str,
    ) -> SessionState {
        let user = AuthService::new(users, admins)
            .register_with_password(name, "pw", Address::default(), false)
            .await
            .unwrap();
        SessionState::Authenticated(user.profile())
    }

    #[tokio::test]
    async fn test_other_users_are_unauthorized_even_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let users = JsonStore::new(dir.path().join("users.json"));
        let admins = JsonStore::new(dir.path().join("admins.json"));
        let session = registered(&users, &admins, "kim").await;
        let accounts = AccountService::new(&users);

        for target in [UserId::new(2), UserId::new(999)] {
            assert!(matches!(
                accounts.get(&session, target).await,
                Err(AuthError::Unauthorized)
            ));
            assert!(matches!(
                accounts.remove(&session, target).await,
                Err(AuthError::Unauthorized)
            ));
        }
        assert!(matches!(
            accounts.get(&SessionState::Anonymous, UserId::new(1)).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_update_email_folds_and_checks_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let users = JsonStore::new(dir.path().join("users.json"));
        let admins = JsonStore::new(dir.path().join("admins.json"));
        let session = registered(&users, &admins, "leo").await;
        registered(&users, &admins, "mia").await;
        let accounts = AccountService::new(&users);
        let id = session.user().unwrap().id;

        let user = accounts
            .update_email(&session, id, "Leo@Mail.com")
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "leo@mail.com");

        assert!(matches!(
            accounts.update_email(&session, id, "MIA").await,
            Err(AuthError::DuplicateUsername)
        ));
    }

    #[tokio::test]
    async fn test_removed_account_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let users = JsonStore::new(dir.path().join("users.json"));
        let admins = JsonStore::new(dir.path().join("admins.json"));
        let session = registered(&users, &admins, "ned").await;
        let accounts = AccountService::new(&users);
        let id = session.user().unwrap().id;

        accounts.remove(&session, id).await.unwrap();

        // The stale snapshot still passes the gate; the record is gone.
        assert!(matches!(
            accounts.get(&session, id).await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            accounts.update_password(&session, id, "new").await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_password_allows_new_login() {
        let dir = tempfile::tempdir().unwrap();
        let users = JsonStore::new(dir.path().join("users.json"));
        let admins = JsonStore::new(dir.path().join("admins.json"));
        let session = registered(&users, &admins, "olga").await;
        let accounts = AccountService::new(&users);
        let id = session.user().unwrap().id;

        accounts.update_password(&session, id, "fresh").await.unwrap();

        let auth = AuthService::new(&users, &admins);
        assert!(auth.login_with_password("olga", "fresh").await.is_ok());
        assert!(auth.login_with_password("olga", "pw").await.is_err());
    }
}
