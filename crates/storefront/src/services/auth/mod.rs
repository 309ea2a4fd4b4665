//! Authentication service.
//!
//! Password login for site users and admins. Stored passwords are Argon2id
//! PHC strings; anything else in the password field is a legacy plaintext
//! value, accepted once and replaced with a hash on the next successful
//! login.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use subtle::ConstantTimeEq;

use watchshop_core::Username;

use crate::db::users::NewUser;
use crate::db::{AdminRepository, JsonStore, UserRepository};
use crate::models::admin::AdminRecord;
use crate::models::user::{Address, UserRecord};

/// Authentication service.
///
/// Handles user registration, user login and admin login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    admins: AdminRepository<'a>,
}

/// Outcome of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordCheck {
    /// Matched an Argon2 hash.
    Hashed,
    /// Matched a legacy plaintext value; the caller should re-hash it.
    LegacyPlaintext,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        users: &'a JsonStore<UserRecord>,
        admins: &'a JsonStore<AdminRecord>,
    ) -> Self {
        Self {
            users: UserRepository::new(users),
            admins: AdminRepository::new(admins),
        }
    }

    /// Register a new user with username and password.
    ///
    /// The username is case-folded before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is blank or too long.
    /// Returns `AuthError::WeakPassword` if the password is empty.
    /// Returns `AuthError::DuplicateUsername` if the username is taken in any case.
    pub async fn register_with_password(
        &self,
        username: &str,
        password: &str,
        address: Address,
        is_admin: bool,
    ) -> Result<UserRecord, AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                username,
                password_hash,
                is_admin,
                address,
            })
            .await
            .map_err(AuthError::from_user_repository)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if check_password(password, &user.password_hash)? == PasswordCheck::LegacyPlaintext {
            let password_hash = hash_password(password)?;
            let upgraded = self
                .users
                .set_password_hash(user.id, password_hash)
                .await
                .map_err(AuthError::from_user_repository)?;
            tracing::info!(user_id = %user.id, "Upgraded legacy plaintext password");
            return Ok(upgraded);
        }

        Ok(user)
    }

    /// Check admin credentials against `admins.json`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login_admin(&self, username: &str, password: &str) -> Result<Username, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let admin = self
            .admins
            .get_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // admins.json is never written by the server, so legacy values stay.
        check_password(password, &admin.password)?;

        Ok(admin.username)
    }

    /// Append a hashed admin record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUsername` if the admin already exists.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = Username::parse(username)?;
        validate_password(password)?;
        let password = hash_password(password)?;

        self.admins
            .create(AdminRecord { username, password })
            .await
            .map_err(AuthError::from_user_repository)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::WeakPassword(
            "password cannot be empty".to_owned(),
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored value.
///
/// Values that parse as a PHC string are verified with Argon2. Anything else
/// is legacy plaintext and is compared in constant time.
fn check_password(password: &str, stored: &str) -> Result<PasswordCheck, AuthError> {
    if let Ok(parsed_hash) = PasswordHash::new(stored) {
        return Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map(|()| PasswordCheck::Hashed)
            .map_err(|_| AuthError::InvalidCredentials);
    }

    if bool::from(password.as_bytes().ct_eq(stored.as_bytes())) {
        Ok(PasswordCheck::LegacyPlaintext)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}
