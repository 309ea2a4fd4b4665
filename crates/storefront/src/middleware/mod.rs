//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (single configured origin, credentials allowed)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Body limit (uploads)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{
    AdminIdentity, OptionalAuth, RequireAdmin, clear_current_admin, clear_session, set_current_admin,
    set_current_user,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
