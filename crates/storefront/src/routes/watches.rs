//! Public catalog route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use watchshop_core::WatchId;

use super::PathParam;
use crate::db::{RepositoryError, WatchRepository};
use crate::error::{AppError, Result};
use crate::models::watch::WatchRecord;
use crate::state::AppState;

/// List every watch.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<WatchRecord>>> {
    let watches = WatchRepository::new(state.watches()).list().await?;
    Ok(Json(watches))
}

/// Show one watch.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<WatchId>,
) -> Result<Json<WatchRecord>> {
    let watch = find_watch(&state, id).await?;
    Ok(Json(watch))
}

/// Look a watch up, mapping a miss to a 404 with a catalog message.
pub(crate) async fn find_watch(state: &AppState, id: WatchId) -> Result<WatchRecord> {
    WatchRepository::new(state.watches())
        .get_by_id(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Watch not found".to_owned()),
            other => other.into(),
        })
}
