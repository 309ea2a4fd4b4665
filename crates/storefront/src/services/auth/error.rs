//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username is empty or too long.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] watchshop_core::UsernameError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Username already taken.
    #[error("username already exists")]
    DuplicateUsername,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The session may not act on this account.
    #[error("unauthorized: not logged in or not permitted to perform this action")]
    Unauthorized,

    /// Repository error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Map repository errors onto account semantics: a missing record is
    /// `UserNotFound`, a conflict is `DuplicateUsername`.
    pub(crate) fn from_user_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::UserNotFound,
            RepositoryError::Conflict(_) => Self::DuplicateUsername,
            other => Self::Repository(other),
        }
    }
}
