//! Cache types for platform API responses.

use crate::platform::types::{Meal, Restaurant, Review};

/// Cached value types. Only catalog reads are cached; auth, cart, and order
/// calls always go upstream.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurant(Box<Restaurant>),
    Restaurants(Vec<Restaurant>),
    Meal(Box<Meal>),
    Meals(Vec<Meal>),
    Reviews(Vec<Review>),
}
