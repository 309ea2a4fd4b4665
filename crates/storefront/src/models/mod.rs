//! Domain models for the storefront.
//!
//! Record types (`UserRecord`, `WatchRecord`, `AdminRecord`) mirror the JSON
//! objects in the data directory field for field. Everything else is derived
//! from them for responses and the session.

pub mod admin;
pub mod session;
pub mod user;
pub mod watch;

pub use admin::AdminRecord;
pub use session::{CurrentAdmin, SessionState};
pub use user::{Address, UserProfile, UserRecord};
pub use watch::{WatchDraft, WatchRecord};
