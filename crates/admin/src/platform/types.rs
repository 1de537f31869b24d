//! Wire types for the platform's operator endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::{MealId, OperatorRole, OrderId, OrderStatus, Price, RestaurantId, UserId};

/// The operator's profile as the platform reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorProfile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: OperatorRole,
    /// The restaurant a provider operates. Absent for platform admins.
    pub restaurant_id: Option<RestaurantId>,
    pub restaurant_name: Option<String>,
}

/// A platform session established by operator login.
#[derive(Debug, Clone)]
pub struct OperatorSession {
    pub token: String,
    pub operator: OperatorProfile,
}

/// Credentials relayed to the platform. Never stored locally.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// A meal on the provider's own menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMeal {
    pub id: MealId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Whether the meal is currently orderable. Toggled upstream.
    #[serde(default = "default_true")]
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

/// Create/update payload for a provider's meal. The platform validates and
/// owns the result.
#[derive(Debug, Clone, Serialize)]
pub struct MealInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub available: bool,
}

/// An incoming order as shown in the provider console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOrder {
    pub id: OrderId,
    pub customer_name: Option<String>,
    pub items: Vec<ProviderOrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line of an incoming order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOrderItem {
    pub name: String,
    pub quantity: u32,
}

/// Status-change payload relayed verbatim; transition legality is enforced
/// by the platform, not the console.
#[derive(Debug, Serialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

/// Marketplace-wide stats for the admin dashboard, aggregated upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_orders: u64,
    pub total_revenue: Price,
    pub active_restaurants: u32,
    pub registered_users: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_profile_deserializes_role() {
        let json = r#"{
            "id": "op_1",
            "email": "owner@trattoria.example",
            "name": "Gia",
            "role": "provider",
            "restaurant_id": "rest_4",
            "restaurant_name": "Trattoria Uno"
        }"#;

        let profile: OperatorProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, OperatorRole::Provider);
        assert_eq!(profile.restaurant_id.unwrap().as_str(), "rest_4");
    }

    #[test]
    fn test_provider_meal_defaults_available() {
        let json = r#"{
            "id": "m1",
            "name": "Carbonara",
            "price": "13.00",
            "image_url": null,
            "category": null
        }"#;

        let meal: ProviderMeal = serde_json::from_str(json).unwrap();
        assert!(meal.available);
    }
}
