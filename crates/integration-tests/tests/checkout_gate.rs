//! Checkout gate integration tests: the single-restaurant policy evaluated
//! against carts built through the full store stack.

use rust_decimal::Decimal;

use tavola_core::cart::{CheckoutBlock, MealSnapshot, checkout_gate};
use tavola_core::types::{MealId, RestaurantId};
use tavola_integration_tests::InMemoryCartRepository;
use tavola_storefront::services::CartStore;

fn snapshot(meal_id: &str, restaurant_id: &str) -> MealSnapshot {
    MealSnapshot {
        meal_id: MealId::new(meal_id),
        name: format!("meal {meal_id}"),
        unit_price: Decimal::new(1000, 2),
        image_url: None,
        restaurant_id: RestaurantId::new(restaurant_id),
        restaurant_name: Some(format!("restaurant {restaurant_id}")),
    }
}

#[tokio::test]
async fn mixed_restaurant_cart_blocks_without_mutating() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    // Writes never enforce the single-restaurant rule
    store.add(snapshot("m1", "r1"), 1).await;
    let cart = store.add(snapshot("m2", "r2"), 1).await;
    assert_eq!(cart.lines().len(), 2);

    // The gate blocks at read time and touches nothing
    let result = checkout_gate(&cart, true);
    assert_eq!(result, Err(CheckoutBlock::MultipleRestaurants(2)));

    let reloaded = store.current().await;
    assert_eq!(reloaded.lines().len(), 2);
    assert_eq!(reloaded, cart);
}

#[tokio::test]
async fn single_restaurant_cart_passes_for_authenticated_shopper() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1"), 2).await;
    let cart = store.add(snapshot("m2", "r1"), 1).await;

    let restaurant = checkout_gate(&cart, true).expect("gate should pass");
    assert_eq!(restaurant, &RestaurantId::new("r1"));
}

#[tokio::test]
async fn anonymous_shopper_is_blocked_before_anything_else() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    let cart = store.add(snapshot("m1", "r1"), 1).await;
    assert_eq!(
        checkout_gate(&cart, false),
        Err(CheckoutBlock::NotAuthenticated)
    );
}

#[tokio::test]
async fn empty_cart_blocks_silently() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    let cart = store.current().await;
    assert_eq!(checkout_gate(&cart, true), Err(CheckoutBlock::EmptyCart));
}

#[tokio::test]
async fn resolving_the_conflict_unblocks_checkout() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1"), 1).await;
    store.add(snapshot("m2", "r2"), 1).await;

    // Shopper removes the second restaurant's line by hand
    let cart = store.remove(&MealId::new("m2")).await;

    let restaurant = checkout_gate(&cart, true).expect("gate should pass");
    assert_eq!(restaurant.as_str(), "r1");
}
