//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use watchshop_core::{UserId, Username};

use super::user::UserProfile;
use crate::services::auth::AuthError;

/// Session-stored admin identity, set by `/admin/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: Username,
}

/// Who the current session belongs to.
///
/// The authenticated snapshot is copied at login and never refreshed from
/// `users.json`, so it goes stale if the record changes later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionState {
    /// Build the state from the snapshot stored in the session, if any.
    #[must_use]
    pub fn from_snapshot(snapshot: Option<UserProfile>) -> Self {
        snapshot.map_or(Self::Anonymous, Self::Authenticated)
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// Allow the request only if it acts on the session's own account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` when anonymous or when `target`
    /// belongs to another user, whether or not `target` exists.
    pub fn authorize(&self, target: UserId) -> Result<&UserProfile, AuthError> {
        match self {
            Self::Authenticated(user) if user.id == target => Ok(user),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user snapshot.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the current admin identity.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for storing the session's basket.
    pub const BASKET: &str = "basket";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::user::Address;

    fn profile(id: i32) -> UserProfile {
        UserProfile {
            id: UserId::new(id),
            username: Username::parse("erin").unwrap(),
            is_admin: false,
            address: Address::default(),
        }
    }

    #[test]
    fn test_anonymous_is_never_authorized() {
        let state = SessionState::from_snapshot(None);
        assert!(matches!(
            state.authorize(UserId::new(1)),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_authorize_own_id_only() {
        let state = SessionState::from_snapshot(Some(profile(5)));
        assert_eq!(state.authorize(UserId::new(5)).unwrap().id, UserId::new(5));
        assert!(matches!(
            state.authorize(UserId::new(6)),
            Err(AuthError::Unauthorized)
        ));
    }
}
