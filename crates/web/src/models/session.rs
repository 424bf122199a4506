//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use recipe_box_core::{UserId, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
}

/// Returned when an operation needs a logged-in user and there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not authenticated")]
pub struct NotAuthenticated;

impl UserIdentity {
    /// Turn an optional session identity into a required one.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when `identity` is `None`.
    pub fn require(identity: Option<Self>) -> Result<Self, NotAuthenticated> {
        identity.ok_or(NotAuthenticated)
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: UserId::new(1),
            username: Username::parse("alice").unwrap(),
        }
    }

    #[test]
    fn test_require_present() {
        assert_eq!(UserIdentity::require(Some(identity())).unwrap(), identity());
    }

    #[test]
    fn test_require_absent() {
        assert_eq!(UserIdentity::require(None), Err(NotAuthenticated));
    }

    #[test]
    fn test_session_round_trip() {
        let value = serde_json::to_value(identity()).unwrap();
        assert_eq!(value["username"], "alice");
        let back: UserIdentity = serde_json::from_value(value).unwrap();
        assert_eq!(back, identity());
    }
}
