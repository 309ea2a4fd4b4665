//! Authentication extractors and session helpers.
//!
//! The session holds at most one user snapshot (`keys::CURRENT_USER`) and at
//! most one admin identity (`keys::CURRENT_ADMIN`).

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session::{CurrentAdmin, SessionState, keys};
use crate::models::user::UserProfile;

/// Extractor for the session's login state.
///
/// Rejects only when the session store cannot be read.
pub struct OptionalAuth(pub SessionState);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session.get::<UserProfile>(keys::CURRENT_USER).await?,
            None => None,
        };

        Ok(Self(SessionState::from_snapshot(user)))
    }
}

/// Who passed the admin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminIdentity {
    /// Logged in through `/admin/login`.
    Admin(CurrentAdmin),
    /// A site user whose snapshot has `isAdmin` set.
    User(UserProfile),
}

impl AdminIdentity {
    /// Name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Admin(admin) => admin.username.as_str(),
            Self::User(user) => user.username.as_str(),
        }
    }
}

/// Extractor that requires admin rights.
///
/// Accepts either an admin session or a user session flagged `isAdmin`.
pub struct RequireAdmin(pub AdminIdentity);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rejection = || AppError::Unauthorized("Unauthorized: admin login required".to_owned());
        let session = parts.extensions.get::<Session>().ok_or_else(rejection)?;

        if let Some(admin) = session.get::<CurrentAdmin>(keys::CURRENT_ADMIN).await? {
            return Ok(Self(AdminIdentity::Admin(admin)));
        }

        match session.get::<UserProfile>(keys::CURRENT_USER).await? {
            Some(user) if user.is_admin => Ok(Self(AdminIdentity::User(user))),
            _ => Err(rejection()),
        }
    }
}

/// Start an authenticated session for `user`.
///
/// Cycles the session id first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &UserProfile,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Mark the session as an admin session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_ADMIN, admin).await
}

/// End the admin part of the session, leaving any user login in place.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

/// Destroy the session: all data (including the basket) is dropped and the
/// client is told to delete the cookie.
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
