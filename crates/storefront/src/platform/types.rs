//! Wire types for the platform API.
//!
//! These mirror the JSON shapes the platform serves. Commerce semantics
//! (pricing, inventory, order transitions, review aggregation) live
//! upstream; these types only carry the results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tavola_core::cart::{Cart, MealSnapshot};
use tavola_core::{MealId, OrderId, OrderStatus, Price, RestaurantId, ReviewId, UserId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A restaurant as listed in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    /// Cuisine label (e.g., "italian").
    pub cuisine: Option<String>,
    /// Average review rating, aggregated upstream.
    pub average_rating: Option<f64>,
    /// Number of reviews behind the average.
    #[serde(default)]
    pub review_count: u32,
}

/// Paginated restaurant listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantList {
    pub restaurants: Vec<Restaurant>,
    pub total: u64,
}

/// A meal on a restaurant's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in the platform's currency. Serialized as a string to
    /// preserve decimal precision.
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Menu section label (e.g., "mains").
    pub category: Option<String>,
}

impl From<&Meal> for MealSnapshot {
    /// Translate a fetched catalog record into the shape the cart consumes.
    ///
    /// This is the producer contract for add-to-cart call sites: price and
    /// name are captured here, at add time, and never refreshed.
    fn from(meal: &Meal) -> Self {
        Self {
            meal_id: meal.id.clone(),
            name: meal.name.clone(),
            unit_price: meal.price,
            image_url: meal.image_url.clone(),
            restaurant_id: meal.restaurant_id.clone(),
            restaurant_name: meal.restaurant_name.clone(),
        }
    }
}

/// A customer review of a restaurant, served pre-moderated by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub restaurant_id: RestaurantId,
    pub author_name: String,
    /// Star rating, 1-5.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// The shopper's profile as the platform reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

/// A platform session established by login or registration.
///
/// `token` is the value of the upstream session cookie; it is held in the
/// shopper's server-side session and relayed on authenticated calls.
#[derive(Debug, Clone)]
pub struct PlatformSession {
    pub token: String,
    pub user: UserProfile,
}

/// Credentials relayed to the platform. Never stored locally.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Registration payload relayed to the platform.
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: Option<&'a str>,
}

// =============================================================================
// Order Types
// =============================================================================

/// One line of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub meal_id: MealId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// A placed order as the platform reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: Option<String>,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Order-creation payload, assembled from the cart at checkout submission.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub restaurant_id: RestaurantId,
    pub items: Vec<CreateOrderItem>,
}

/// One requested line in an order-creation payload.
///
/// The unit price is the cart's add-time snapshot; the platform revalidates
/// it against the live menu and owns the final pricing.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderItem {
    pub meal_id: MealId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl CreateOrderRequest {
    /// Assemble an order request from the cart for the given restaurant.
    ///
    /// The caller is expected to have run the checkout gate first, so every
    /// line belongs to `restaurant_id`.
    #[must_use]
    pub fn from_cart(restaurant_id: RestaurantId, cart: &Cart) -> Self {
        Self {
            restaurant_id,
            items: cart
                .lines()
                .iter()
                .map(|line| CreateOrderItem {
                    meal_id: line.meal_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn meal() -> Meal {
        Meal {
            id: MealId::new("m1"),
            restaurant_id: RestaurantId::new("r1"),
            restaurant_name: Some("Trattoria Uno".to_string()),
            name: "Cacio e pepe".to_string(),
            description: String::new(),
            price: Decimal::new(1450, 2),
            image_url: None,
            category: Some("mains".to_string()),
        }
    }

    #[test]
    fn test_meal_snapshot_captures_price_and_seller() {
        let snapshot = MealSnapshot::from(&meal());
        assert_eq!(snapshot.meal_id.as_str(), "m1");
        assert_eq!(snapshot.unit_price, Decimal::new(1450, 2));
        assert_eq!(snapshot.restaurant_id.as_str(), "r1");
        assert_eq!(snapshot.restaurant_name.as_deref(), Some("Trattoria Uno"));
    }

    #[test]
    fn test_create_order_request_from_cart() {
        let mut cart = Cart::new();
        cart.add(MealSnapshot::from(&meal()), 2);

        let request = CreateOrderRequest::from_cart(RestaurantId::new("r1"), &cart);
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[0].unit_price, Decimal::new(1450, 2));
    }

    #[test]
    fn test_meal_price_deserializes_from_string() {
        let json = r#"{
            "id": "m7",
            "restaurant_id": "r2",
            "restaurant_name": null,
            "name": "Margherita",
            "description": "",
            "price": "11.90",
            "image_url": null,
            "category": "pizza"
        }"#;

        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.price, Decimal::new(1190, 2));
    }
}
