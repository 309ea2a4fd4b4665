//! Basket route handlers.
//!
//! The basket is stored in the session under `keys::BASKET`, so each client
//! has its own and it disappears with the session.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use watchshop_core::WatchId;

use super::JsonBody;
use crate::db::WatchRepository;
use crate::error::Result;
use crate::models::session::keys;
use crate::services::basket::{Basket, BasketItem};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the basket from the session; a missing or unreadable one is empty.
/// The session's basket; empty when none has been saved yet.
async fn load_basket(
    session: &Session,
) -> std::result::Result<Basket, tower_sessions::session::Error> {
    Ok(session
        .get::<Basket>(keys::BASKET)
        .await?
        .unwrap_or_default())
}

/// Store the basket in the session.
async fn save_basket(
    session: &Session,
    basket: &Basket,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(keys::BASKET, basket).await
}

/// A body naming one watch.
#[derive(Debug, Deserialize)]
pub struct WatchRef {
    pub id: WatchId,
}

/// Set-quantity body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub id: WatchId,
    pub quantity: u32,
}

/// List the basket.
#[instrument(skip(session))]
pub async fn items(session: Session) -> Result<Json<Vec<BasketItem>>> {
    Ok(Json(load_basket(&session).await?.items().to_vec()))
}

/// Add one of a watch from the catalog.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<WatchRef>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut basket = load_basket(&session).await?;
    let watch = basket
        .add(&WatchRepository::new(state.watches()), body.id)
        .await?;
    save_basket(&session, &basket).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Watch added to basket", "watch": watch })),
    ))
}

/// Overwrite the quantity of a line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    JsonBody(body): JsonBody<UpdateQuantity>,
) -> Result<Json<Value>> {
    let mut basket = load_basket(&session).await?;
    basket.set_quantity(body.id, body.quantity)?;
    save_basket(&session, &basket).await?;

    Ok(Json(json!({ "message": "Item quantity updated successfully" })))
}

/// Take one of a watch out of the basket.
#[instrument(skip(session))]
pub async fn remove(session: Session, JsonBody(body): JsonBody<WatchRef>) -> Result<Json<Value>> {
    let mut basket = load_basket(&session).await?;
    basket.decrement_or_remove(body.id)?;
    save_basket(&session, &basket).await?;

    Ok(Json(json!({ "message": "Watch removed from basket", "id": body.id })))
}

/// Drop a watch from the basket whatever its quantity.
#[instrument(skip(session))]
pub async fn remove_watch(
    session: Session,
    JsonBody(body): JsonBody<WatchRef>,
) -> Result<Json<Value>> {
    let mut basket = load_basket(&session).await?;
    basket.remove_entirely(body.id)?;
    save_basket(&session, &basket).await?;

    Ok(Json(json!({
        "message": "Watch completely removed from basket",
        "id": body.id,
    })))
}

/// Empty the basket.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<Value>> {
    let mut basket = load_basket(&session).await?;
    basket.clear();
    save_basket(&session, &basket).await?;

    Ok(Json(json!({ "message": "Basket cleared successfully" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_basket_defaults_to_empty() {
        let basket = load_basket(&session()).await.unwrap();
        assert!(basket.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_basket_is_an_error() {
        let session = session();
        session.insert(keys::BASKET, "not a basket").await.unwrap();

        assert!(load_basket(&session).await.is_err());
        assert_eq!(
            session.get::<String>(keys::BASKET).await.unwrap().as_deref(),
            Some("not a basket")
        );
    }
}
