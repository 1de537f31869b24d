//! Session-related types.
//!
//! Types stored in the tower-session. The session is the storefront's only
//! durable per-device storage: it carries the shopper's identity, the
//! relayed platform session token, and the cart record.

use serde::{Deserialize, Serialize};

use tavola_core::UserId;

use crate::platform::UserProfile;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in shopper.
/// The authoritative profile lives upstream; this is a display copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Platform user ID.
    pub id: UserId,
    /// Email address as the platform reports it.
    pub email: String,
    /// Display name, if the shopper set one.
    pub name: Option<String>,
}

impl From<UserProfile> for CurrentUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
        }
    }
}

impl CurrentUser {
    /// Name to greet the shopper with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in shopper.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the relayed platform session token.
    pub const PLATFORM_TOKEN: &str = "platform_token";

    /// Key for the persisted cart record. This is the single named
    /// durable-storage record the cart subsystem owns; the serialized
    /// entry list is written here in full after every mutation.
    pub const CART: &str = "cart";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_name() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            email: "ada@example.com".to_string(),
            name: Some("Ada".to_string()),
        };
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            email: "ada@example.com".to_string(),
            name: None,
        };
        assert_eq!(user.display_name(), "ada@example.com");
    }
}
