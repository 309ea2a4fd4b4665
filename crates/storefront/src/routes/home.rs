//! Home route handler.

/// Plain-text welcome.
pub async fn home() -> &'static str {
    "Welcome to the server!"
}
