//! Checkout-gate policy.
//!
//! The one piece of non-trivial policy in the cart subsystem: the
//! single-restaurant rule is evaluated here, at read time on the checkout
//! attempt, and never enforced as a write-time constraint on adds.

use thiserror::Error;

use crate::types::RestaurantId;

use super::Cart;

/// Reasons a checkout attempt is blocked.
///
/// None of these mutate the cart; the shopper resolves them manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutBlock {
    /// No authenticated session; the surface redirects to login.
    #[error("sign in to place an order")]
    NotAuthenticated,

    /// Nothing to order; the surface aborts silently.
    #[error("your cart is empty")]
    EmptyCart,

    /// Entries from more than one restaurant. The shopper must remove
    /// items from all but one restaurant; nothing is auto-removed.
    #[error("your cart has items from {0} restaurants - orders can only include one")]
    MultipleRestaurants(usize),
}

/// Validate a checkout attempt against the current cart state.
///
/// Checks run in order: authentication, emptiness, then the
/// single-restaurant rule. On success returns the one restaurant the order
/// will be placed with.
///
/// # Errors
///
/// Returns the first applicable [`CheckoutBlock`]. The cart is never
/// mutated on any path.
pub fn checkout_gate(cart: &Cart, authenticated: bool) -> Result<&RestaurantId, CheckoutBlock> {
    if !authenticated {
        return Err(CheckoutBlock::NotAuthenticated);
    }

    if cart.is_empty() {
        return Err(CheckoutBlock::EmptyCart);
    }

    let restaurants = cart.restaurant_ids();
    match restaurants.as_slice() {
        [single] => Ok(single),
        many => Err(CheckoutBlock::MultipleRestaurants(many.len())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::MealSnapshot;
    use crate::types::MealId;

    fn snapshot(meal_id: &str, restaurant_id: &str) -> MealSnapshot {
        MealSnapshot {
            meal_id: MealId::new(meal_id),
            name: meal_id.to_owned(),
            unit_price: Decimal::new(500, 2),
            image_url: None,
            restaurant_id: RestaurantId::new(restaurant_id),
            restaurant_name: None,
        }
    }

    #[test]
    fn test_gate_requires_authentication_first() {
        // Auth is checked before emptiness: an anonymous shopper with an
        // empty cart is sent to login, not silently dropped.
        let cart = Cart::new();
        assert_eq!(
            checkout_gate(&cart, false),
            Err(CheckoutBlock::NotAuthenticated)
        );
    }

    #[test]
    fn test_gate_blocks_empty_cart() {
        let cart = Cart::new();
        assert_eq!(checkout_gate(&cart, true), Err(CheckoutBlock::EmptyCart));
    }

    #[test]
    fn test_gate_blocks_multiple_restaurants_without_mutating() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1"), 1);
        cart.add(snapshot("m2", "r2"), 1);

        let before = cart.clone();
        assert_eq!(
            checkout_gate(&cart, true),
            Err(CheckoutBlock::MultipleRestaurants(2))
        );
        assert_eq!(cart, before);
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_gate_passes_single_restaurant() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1"), 2);
        cart.add(snapshot("m2", "r1"), 1);

        let restaurant = checkout_gate(&cart, true).unwrap();
        assert_eq!(restaurant.as_str(), "r1");
    }

    #[test]
    fn test_block_messages_are_user_facing() {
        let message = CheckoutBlock::MultipleRestaurants(3).to_string();
        assert!(message.contains("3 restaurants"));
    }
}
