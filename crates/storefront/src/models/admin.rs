//! Admin credential records.

use core::fmt;

use serde::{Deserialize, Serialize};

use watchshop_core::Username;

/// An entry in `admins.json`.
///
/// `password` is an Argon2 PHC string when written by `ws-cli`; hand-edited
/// files may still contain plaintext.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub username: Username,
    pub password: String,
}

impl fmt::Debug for AdminRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
