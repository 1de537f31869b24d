//! Session-related types.

use serde::{Deserialize, Serialize};

use tavola_core::{OperatorRole, RestaurantId, UserId};

use crate::platform::OperatorProfile;

/// Session-stored operator identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOperator {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: OperatorRole,
    /// The restaurant a provider operates. Absent for platform admins.
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
}

impl From<OperatorProfile> for CurrentOperator {
    fn from(profile: OperatorProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            role: profile.role,
            restaurant_id: profile.restaurant_id,
            restaurant_name: profile.restaurant_name,
        }
    }
}

impl CurrentOperator {
    /// Whether this operator may see marketplace-wide admin surfaces.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, OperatorRole::Admin)
    }

    /// Name to show in the console header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in operator.
    pub const CURRENT_OPERATOR: &str = "current_operator";

    /// Key for the relayed platform session token.
    pub const PLATFORM_TOKEN: &str = "platform_token";
}
