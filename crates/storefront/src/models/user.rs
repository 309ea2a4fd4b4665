//! User domain types.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use watchshop_core::{UserId, Username};

use crate::db::Identified;

/// Postal address fields stored inline on a user record.
///
/// Every field is optional; absent fields are omitted from `users.json`.
/// Numbers and booleans are accepted and kept as text, since older records
/// hold whatever the client sent (e.g. `"postalcode": 90210`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub postalcode: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "loose_text", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Flag(bool),
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseText>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        LooseText::Text(s) => s,
        LooseText::Integer(n) => n.to_string(),
        LooseText::Unsigned(n) => n.to_string(),
        LooseText::Float(n) => n.to_string(),
        LooseText::Flag(b) => b.to_string(),
    }))
}

/// A user as persisted in `users.json`.
///
/// `password` holds an Argon2 PHC string. Records written by older versions
/// may still hold plaintext until the user's next login.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: Username,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub address: Address,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("is_admin", &self.is_admin)
            .field("address", &self.address)
            .finish()
    }
}

impl Identified for UserRecord {
    fn id(&self) -> i32 {
        self.id.as_i32()
    }
}

impl UserRecord {
    /// The record without its password hash.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            is_admin: self.is_admin,
            address: self.address.clone(),
        }
    }
}

/// Public view of a user: what responses and the session carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(flatten)]
    pub address: Address,
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            is_admin: record.is_admin,
            address: record.address,
        }
    }
}
