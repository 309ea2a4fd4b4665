//! Admin route handlers: admin login, catalog management and image upload.

use std::path::Path;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use watchshop_core::WatchId;

use super::watches::find_watch;
use super::{JsonBody, PathParam, secret_string};
use crate::db::{RepositoryError, WatchRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::session::CurrentAdmin;
use crate::models::watch::{WatchDraft, WatchRecord};
use crate::services::AuthService;
use crate::state::AppState;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

/// Admin login body.
#[derive(Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    #[serde(deserialize_with = "secret_string")]
    pub password: SecretString,
}

/// Check the credentials against `admins.json` and mark the session.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<AdminLoginRequest>,
) -> Result<Json<Value>> {
    let username = AuthService::new(state.users(), state.admins())
        .login_admin(&body.username, body.password.expose_secret())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Admin login failed"))?;

    set_current_admin(&session, &CurrentAdmin { username }).await?;
    tracing::info!("Admin logged in");

    Ok(Json(json!({ "message": "Login successful" })))
}

/// Drop the admin identity from the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_admin(&session).await?;
    Ok(Json(json!({ "message": "Logout successful" })))
}

/// Plain-text welcome for admins.
pub async fn index(RequireAdmin(_admin): RequireAdmin) -> &'static str {
    "Welcome to the admin section."
}

/// Create a watch.
#[instrument(skip(state, admin, draft), fields(admin = admin.name()))]
pub async fn create_watch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(draft): JsonBody<WatchDraft>,
) -> Result<(StatusCode, Json<WatchRecord>)> {
    draft.validate().map_err(AppError::BadRequest)?;

    let watch = WatchRepository::new(state.watches()).create(draft).await?;
    tracing::info!(watch_id = %watch.id, "Watch created");

    Ok((StatusCode::CREATED, Json(watch)))
}

/// Show one watch.
#[instrument(skip(state, _admin))]
pub async fn show_watch(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    PathParam(id): PathParam<WatchId>,
) -> Result<Json<WatchRecord>> {
    Ok(Json(find_watch(&state, id).await?))
}

/// Replace every field of a watch.
#[instrument(skip(state, admin, draft), fields(admin = admin.name()))]
pub async fn update_watch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathParam(id): PathParam<WatchId>,
    JsonBody(draft): JsonBody<WatchDraft>,
) -> Result<Json<Value>> {
    draft.validate().map_err(AppError::BadRequest)?;

    WatchRepository::new(state.watches())
        .replace(id, draft)
        .await
        .map_err(watch_not_found)?;

    Ok(Json(json!({ "message": "Watch updated successfully" })))
}

/// Delete a watch.
#[instrument(skip(state, admin), fields(admin = admin.name()))]
pub async fn delete_watch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    PathParam(id): PathParam<WatchId>,
) -> Result<Json<Value>> {
    WatchRepository::new(state.watches())
        .delete(id)
        .await
        .map_err(watch_not_found)?;
    tracing::info!(watch_id = %id, "Watch deleted");

    Ok(Json(json!({ "message": "Watch deleted successfully" })))
}

/// Store the `image` field of a multipart upload in the public directory.
#[instrument(skip(state, admin, multipart), fields(admin = admin.name()))]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .and_then(sanitize_file_name)
            .ok_or_else(|| AppError::BadRequest("Invalid file name".to_owned()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let public_dir = &state.config().public_dir;
        tokio::fs::create_dir_all(public_dir)
            .await
            .map_err(RepositoryError::Io)?;
        tokio::fs::write(public_dir.join(&file_name), &bytes)
            .await
            .map_err(RepositoryError::Io)?;

        tracing::info!(file_name = %file_name, size = bytes.len(), "Image uploaded");
        return Ok(Json(json!({ "message": "Image uploaded successfully" })));
    }

    Err(AppError::BadRequest("No image uploaded".to_owned()))
}

fn watch_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Watch not found".to_owned()),
        other => other.into(),
    }
}

/// Reduce a client-supplied file name to its last path component.
///
/// Returns `None` for names that are empty or only dots.
fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    let base = Path::new(base).file_name()?.to_str()?;

    if base.is_empty() || base.chars().all(|c| c == '.') {
        return None;
    }
    Some(base.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_name("diver.png").as_deref(), Some("diver.png"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(
            sanitize_file_name("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\me\\watch.jpg").as_deref(),
            Some("watch.jpg")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("uploads/"), None);
    }
}
