//! Watchshop storefront library.
//!
//! A small shop backend: a watch catalog, user accounts with session login,
//! a per-session basket and an admin catalog API, persisted as JSON files in
//! a data directory.
//!
//! The binary (`main.rs`) only loads configuration, sets up tracing and
//! Sentry, and serves [`app`]. Tests build the same router against a
//! temporary data directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Method, Request, StatusCode, header},
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use config::StorefrontConfig;
use state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let config = state.config().clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::create_session_layer(&config))
        .layer(cors_layer(&config))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for the single configured browser origin, with cookies allowed.
fn cors_layer(config: &StorefrontConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the data directory cannot be read.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match tokio::fs::read_dir(&state.config().data_dir).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Data directory not readable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
