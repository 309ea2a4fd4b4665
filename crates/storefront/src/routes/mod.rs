//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Welcome text
//!
//! # Catalog
//! GET  /watches                 - All watches
//! GET  /watches/{id}            - One watch
//!
//! # Auth
//! POST /register                - Create an account
//! POST /login                   - Start a session
//! GET  /auth-check              - Current session state
//! POST /logout                  - End the session
//!
//! # Account (session must own {id})
//! GET  /account/email/{id}      - Current email
//! PUT  /account/email/{id}      - Change email
//! PUT  /account/password/{id}   - Change password
//! GET  /account/address/{id}    - Current address
//! PUT  /account/address/{id}    - Replace address
//! DELETE /account/{id}          - Delete account and end session
//!
//! # Basket (per session)
//! GET  /basket/items            - Basket contents
//! POST /basket/add              - Add one of a watch
//! POST /basket/update           - Set a line's quantity
//! DELETE /basket/remove         - Take one away
//! POST /basket/removeWatch      - Drop a line
//! POST /basket/clear            - Empty the basket
//!
//! # Admin
//! POST /admin/login             - Start an admin session
//! POST /admin/logout            - End it
//! GET  /admin                   - Welcome text (admin)
//! POST /admin/watches           - Create a watch (admin)
//! GET  /admin/watches/{id}      - One watch (admin)
//! PUT  /admin/watches/{id}      - Replace a watch (admin)
//! DELETE /admin/watches/{id}    - Delete a watch (admin)
//! POST /admin/upload-image      - Store an image in the public dir (admin)
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod basket;
pub mod home;
pub mod watches;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::{delete, get, post},
};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;
use crate::state::AppState;

/// JSON request body whose rejections render as `{"error": ...}` with 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Path parameters whose rejections render as `{"error": ...}` with 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

/// Deserialize a password straight into a `SecretString` so it never sits
/// in a loggable `String` field.
pub(crate) fn secret_string<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/email/{id}",
            get(account::get_email).put(account::update_email),
        )
        .route("/password/{id}", axum::routing::put(account::update_password))
        .route(
            "/address/{id}",
            get(account::get_address).put(account::update_address),
        )
        .route("/{id}", delete(account::remove))
}

/// Create the basket routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(basket::items))
        .route("/add", post(basket::add))
        .route("/update", post(basket::update))
        .route("/remove", delete(basket::remove))
        .route("/removeWatch", post(basket::remove_watch))
        .route("/clear", post(basket::clear))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/watches", post(admin::create_watch))
        .route(
            "/watches/{id}",
            get(admin::show_watch)
                .put(admin::update_watch)
                .delete(admin::delete_watch),
        )
        .route("/upload-image", post(admin::upload_image))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        // Catalog
        .route("/watches", get(watches::index))
        .route("/watches/{id}", get(watches::show))
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/auth-check", get(auth::auth_check))
        .route("/logout", post(auth::logout))
        .nest("/account", account_routes())
        .nest("/basket", basket_routes())
        .nest("/admin", admin_routes())
}
