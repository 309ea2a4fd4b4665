//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::basket::BasketError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication or account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Basket operation failed.
    #[error("Basket error: {0}")]
    Basket(#[from] BasketError),

    /// Reading or writing the session failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to do this.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

const INTERNAL: &str = "Internal server error";

fn repository_response(err: &RepositoryError, not_found: &str) -> (StatusCode, String) {
    match err {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, not_found.to_owned()),
        RepositoryError::Conflict(msg) => (StatusCode::BAD_REQUEST, capitalize(msg)),
        RepositoryError::Io(_) | RepositoryError::DataCorruption(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_owned())
        }
    }
}

impl AppError {
    /// Status code and client-facing message.
    ///
    /// Internal details are never exposed to clients.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Repository(err) => repository_response(err, "Not found"),
            Self::Auth(err) => match err {
                AuthError::InvalidUsername(e) => (StatusCode::BAD_REQUEST, capitalize(&e.to_string())),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Incorrect username or password".to_owned(),
                ),
                AuthError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_owned()),
                AuthError::DuplicateUsername => {
                    (StatusCode::BAD_REQUEST, "Username already exists".to_owned())
                }
                AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, capitalize(msg)),
                AuthError::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: User not logged in or does not have permission to perform this action"
                        .to_owned(),
                ),
                AuthError::Repository(err) => repository_response(err, "User not found"),
                AuthError::PasswordHash => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_owned()),
            },
            Self::Basket(err) => match err {
                BasketError::WatchNotFound(_) => (StatusCode::NOT_FOUND, "Watch not found".to_owned()),
                BasketError::NotInBasket(_) => {
                    (StatusCode::NOT_FOUND, "Item not found in basket".to_owned())
                }
                BasketError::InvalidQuantity => (
                    StatusCode::BAD_REQUEST,
                    "Quantity must be at least 1".to_owned(),
                ),
                BasketError::Repository(err) => repository_response(err, "Watch not found"),
            },
            Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_owned())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
