//! Shopping cart domain model.
//!
//! The cart is the only pre-order state the client owns: an ordered list of
//! line items, unique per meal, with quantities. All mutation operations are
//! total functions over the entry list - they never fail and never reject an
//! add, even across restaurants. The single-restaurant rule is enforced at
//! read time by the [`checkout`] gate, not at write time.
//!
//! Persistence is a side channel owned by the caller (see the storefront's
//! `CartRepository`); this module is pure and synchronous.

mod checkout;

pub use checkout::{CheckoutBlock, checkout_gate};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MealId, RestaurantId};

/// Snapshot of a meal taken at the moment it is added to the cart.
///
/// This is the producer contract for add-to-cart call sites: the name,
/// price, and image are captured once and never refreshed from the catalog,
/// so a later price change upstream does not silently reprice a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSnapshot {
    /// Opaque meal identifier; the cart's uniqueness key.
    pub meal_id: MealId,
    /// Display name at add time.
    pub name: String,
    /// Unit price at add time. Non-negative; never re-fetched.
    pub unit_price: Decimal,
    /// Display image, if the catalog had one.
    pub image_url: Option<String>,
    /// The selling restaurant. Used only by the checkout gate.
    pub restaurant_id: RestaurantId,
    /// Restaurant display name, if known at the call site.
    pub restaurant_name: Option<String>,
}

/// One entry in the cart: a meal snapshot plus the requested quantity.
///
/// Invariant: `quantity >= 1` for any line present in a cart. Operations
/// that would drive it to zero remove the line instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub meal_id: MealId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    fn from_snapshot(meal: MealSnapshot, quantity: u32) -> Self {
        Self {
            meal_id: meal.meal_id,
            name: meal.name,
            unit_price: meal.unit_price,
            image_url: meal.image_url,
            restaurant_id: meal.restaurant_id,
            restaurant_name: meal.restaurant_name,
            quantity,
        }
    }

    /// Line total: unit price times quantity. Exact decimal, no rounding.
    #[must_use]
    pub fn line_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The shopper's cart: an ordered collection of [`CartLine`], unique by
/// meal ID.
///
/// Serializes to the exact payload shape written to durable storage, so a
/// persisted cart round-trips without a separate wire type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Current entries, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for a meal, if present.
    #[must_use]
    pub fn line(&self, meal_id: &MealId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.meal_id == meal_id)
    }

    /// Add `quantity` units of a meal.
    ///
    /// If a line for the meal already exists its quantity is incremented and
    /// the originally captured snapshot (price, name, image) is preserved -
    /// a second add never refreshes the price. Otherwise a new line is
    /// appended. A zero `quantity` is a no-op.
    ///
    /// Adding never fails and never rejects a restaurant mismatch; the
    /// single-restaurant rule is checked by [`checkout_gate`] instead.
    pub fn add(&mut self, meal: MealSnapshot, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.lines.iter_mut().find(|l| l.meal_id == meal.meal_id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine::from_snapshot(meal, quantity)),
        }
    }

    /// Remove the line for a meal. No-op if the meal is not in the cart.
    pub fn remove(&mut self, meal_id: &MealId) {
        self.lines.retain(|l| &l.meal_id != meal_id);
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// A `quantity` of zero behaves exactly like [`Cart::remove`]; the cart
    /// never stores a non-positive quantity. No-op if the meal is absent.
    pub fn set_quantity(&mut self, meal_id: &MealId, quantity: u32) {
        if quantity == 0 {
            self.remove(meal_id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| &l.meal_id == meal_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart unconditionally, returning it to its initial state.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total number of units across all lines.
    ///
    /// Recomputed from the live list on every call; the cart caches no
    /// derived totals.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Total price across all lines as an exact decimal.
    ///
    /// Rounding and currency formatting are display concerns; the cart
    /// performs neither.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_price).sum()
    }

    /// Distinct restaurants currently represented in the cart, in
    /// first-seen order.
    #[must_use]
    pub fn restaurant_ids(&self) -> Vec<&RestaurantId> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if !seen.contains(&&line.restaurant_id) {
                seen.push(&line.restaurant_id);
            }
        }
        seen
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(meal_id: &str, restaurant_id: &str, cents: i64) -> MealSnapshot {
        MealSnapshot {
            meal_id: MealId::new(meal_id),
            name: format!("meal {meal_id}"),
            unit_price: Decimal::new(cents, 2),
            image_url: None,
            restaurant_id: RestaurantId::new(restaurant_id),
            restaurant_name: Some(format!("restaurant {restaurant_id}")),
        }
    }

    #[test]
    fn test_add_same_meal_accumulates_one_line() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 950), 1);
        cart.add(snapshot("m1", "r1", 950), 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&MealId::new("m1")).unwrap().quantity, 2);
        assert_eq!(cart.total_price(), Decimal::new(1900, 2));
    }

    #[test]
    fn test_add_preserves_original_snapshot() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 950), 1);

        // Same meal added again with a different catalog price
        let mut repriced = snapshot("m1", "r1", 1200);
        repriced.name = "renamed".to_owned();
        cart.add(repriced, 1);

        let line = cart.line(&MealId::new("m1")).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Decimal::new(950, 2));
        assert_eq!(line.name, "meal m1");
    }

    #[test]
    fn test_add_with_quantity_delta() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 3);
        cart.add(snapshot("m1", "r1", 500), 2);

        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_never_rejects_second_restaurant() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 1);
        cart.add(snapshot("m2", "r2", 700), 1);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.restaurant_ids().len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 1);
        cart.remove(&MealId::new("m2"));

        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_absolute_not_additive() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 4);
        cart.set_quantity(&MealId::new("m1"), 2);

        assert_eq!(cart.line(&MealId::new("m1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 500), 1);
        cart.set_quantity(&MealId::new("m1"), 0);

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.set_quantity(&MealId::new("ghost"), 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_recomputed_from_lines() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 950), 2);
        cart.add(snapshot("m2", "r1", 425), 1);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::new(2325, 2));

        cart.remove(&MealId::new("m2"));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Decimal::new(1900, 2));
    }

    #[test]
    fn test_clear_returns_to_initial_state() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 950), 2);
        cart.add(snapshot("m2", "r2", 425), 1);
        cart.clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart, Cart::new());

        // Still usable after clearing
        cart.add(snapshot("m3", "r3", 100), 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_fresh_cart_totals_are_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_restaurant_ids_first_seen_order() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r2", 100), 1);
        cart.add(snapshot("m2", "r1", 100), 1);
        cart.add(snapshot("m3", "r2", 100), 1);

        let ids = cart.restaurant_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "r2");
        assert_eq!(ids[1].as_str(), "r1");
    }

    #[test]
    fn test_serde_roundtrip_preserves_entries() {
        let mut cart = Cart::new();
        cart.add(snapshot("m1", "r1", 950), 2);
        cart.add(snapshot("m2", "r1", 425), 1);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(restored.total_items(), 3);
    }
}
