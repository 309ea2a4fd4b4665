//! Account route handlers.
//!
//! Every handler passes the session to `AccountService`, which rejects any
//! request whose session does not own the `{id}` in the path.

use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use watchshop_core::UserId;

use super::{JsonBody, PathParam, secret_string};
use crate::error::{Result, clear_sentry_user};
use crate::middleware::{OptionalAuth, clear_session};
use crate::models::user::Address;
use crate::services::AccountService;
use crate::state::AppState;

/// New email body.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// New password body.
#[derive(Deserialize)]
pub struct PasswordRequest {
    #[serde(deserialize_with = "secret_string")]
    pub password: SecretString,
}

/// Current email (the username).
#[instrument(skip(state, session_state))]
pub async fn get_email(
    State(state): State<AppState>,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<Value>> {
    let user = AccountService::new(state.users())
        .get(&session_state, id)
        .await?;

    Ok(Json(json!({ "email": user.username })))
}

/// Change the email.
#[instrument(skip(state, session_state, body))]
pub async fn update_email(
    State(state): State<AppState>,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
    JsonBody(body): JsonBody<EmailRequest>,
) -> Result<Json<Value>> {
    let user = AccountService::new(state.users())
        .update_email(&session_state, id, &body.email)
        .await?;

    Ok(Json(json!({
        "message": "Email updated successfully",
        "user": user,
    })))
}

/// Change the password.
#[instrument(skip(state, session_state, body))]
pub async fn update_password(
    State(state): State<AppState>,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
    JsonBody(body): JsonBody<PasswordRequest>,
) -> Result<Json<Value>> {
    AccountService::new(state.users())
        .update_password(&session_state, id, body.password.expose_secret())
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// Current address fields; absent fields are `null`.
#[instrument(skip(state, session_state))]
pub async fn get_address(
    State(state): State<AppState>,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<Value>> {
    let Address {
        street,
        postalcode,
        city,
        country,
        region,
    } = AccountService::new(state.users())
        .get(&session_state, id)
        .await?
        .address;

    Ok(Json(json!({
        "street": street,
        "postalcode": postalcode,
        "city": city,
        "country": country,
        "region": region,
    })))
}

/// Replace the address.
#[instrument(skip(state, session_state, address))]
pub async fn update_address(
    State(state): State<AppState>,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
    JsonBody(address): JsonBody<Address>,
) -> Result<Json<Value>> {
    let user = AccountService::new(state.users())
        .update_address(&session_state, id, address)
        .await?;

    Ok(Json(json!({
        "message": "Address added/updated successfully",
        "user": user,
    })))
}

/// Delete the account and end the session.
#[instrument(skip(state, session, session_state))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(session_state): OptionalAuth,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<Value>> {
    AccountService::new(state.users())
        .remove(&session_state, id)
        .await?;

    clear_session(&session).await?;
    clear_sentry_user();

    Ok(Json(json!({ "message": "Account removed successfully" })))
}
