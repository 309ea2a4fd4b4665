//! Registration, login and logout route handlers.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use super::{JsonBody, secret_string};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_session, set_current_user};
use crate::models::session::SessionState;
use crate::models::user::{Address, UserProfile};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
///
/// Any `isAdmin` field sent by the client is ignored.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(deserialize_with = "secret_string")]
    pub password: SecretString,
    #[serde(flatten)]
    pub address: Address,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(deserialize_with = "secret_string")]
    pub password: SecretString,
}

/// Register a new (non-admin) user.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = AuthService::new(state.users(), state.admins())
        .register_with_password(
            &body.username,
            body.password.expose_secret(),
            body.address,
            false,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user.profile(),
        })),
    ))
}

/// Log in and bind the session to a snapshot of the user.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<Value>> {
    let user = AuthService::new(state.users(), state.admins())
        .login_with_password(&body.username, body.password.expose_secret())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    let profile = UserProfile::from(user);
    set_current_user(&session, &profile).await?;
    set_sentry_user(&profile.id, Some(profile.username.as_str()));
    tracing::info!(user_id = %profile.id, "User logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "userId": profile.id,
    })))
}

/// Report whether the session is logged in, with the snapshot taken at login.
pub async fn auth_check(OptionalAuth(session_state): OptionalAuth) -> Json<Value> {
    match session_state {
        SessionState::Authenticated(user) => Json(json!({ "loggedIn": true, "user": user })),
        SessionState::Anonymous => Json(json!({ "loggedIn": false })),
    }
}

/// Destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_session(&session).await?;
    clear_sentry_user();

    Ok(Json(json!({ "message": "Logout successful" })))
}
