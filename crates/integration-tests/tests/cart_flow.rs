//! Cart flow integration tests: mutations, derived totals, and persistence
//! semantics through the full store + repository stack.

use rust_decimal::Decimal;

use tavola_core::cart::MealSnapshot;
use tavola_core::types::{MealId, RestaurantId};
use tavola_integration_tests::InMemoryCartRepository;
use tavola_storefront::services::CartStore;

fn snapshot(meal_id: &str, restaurant_id: &str, cents: i64) -> MealSnapshot {
    MealSnapshot {
        meal_id: MealId::new(meal_id),
        name: format!("meal {meal_id}"),
        unit_price: Decimal::new(cents, 2),
        image_url: None,
        restaurant_id: RestaurantId::new(restaurant_id),
        restaurant_name: None,
    }
}

#[tokio::test]
async fn repeated_adds_accumulate_into_one_line() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1", 950), 1).await;
    let cart = store.add(snapshot("m1", "r1", 950), 1).await;

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.total_items(), 2);
    assert_eq!(cart.total_price(), Decimal::new(1900, 2));
}

#[tokio::test]
async fn batch_add_is_one_persistence_write() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    // "Add 4 from the detail page" is one call and one write, with the same
    // end state as four sequential unit adds
    store.add(snapshot("m1", "r1", 500), 4).await;

    assert_eq!(repo.save_count(), 1);
    assert_eq!(
        repo.persisted().map(|cart| cart.total_items()),
        Some(4)
    );
}

#[tokio::test]
async fn update_quantity_is_absolute_and_zero_removes() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1", 500), 3).await;

    let cart = store.set_quantity(&MealId::new("m1"), 2).await;
    assert_eq!(cart.line(&MealId::new("m1")).map(|l| l.quantity), Some(2));

    let cart = store.set_quantity(&MealId::new("m1"), 0).await;
    assert!(cart.is_empty());
    assert_eq!(cart.total_items(), 0);
}

#[tokio::test]
async fn persisted_record_survives_a_restart() {
    let repo = InMemoryCartRepository::new();

    // First "session" mutates and goes away
    {
        let store = CartStore::new(&repo);
        store.add(snapshot("m1", "r1", 950), 2).await;
        store.add(snapshot("m2", "r1", 425), 1).await;
    }

    // A fresh store over the same storage sees the exact entry list
    let store = CartStore::new(&repo);
    let cart = store.current().await;

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), Decimal::new(2325, 2));
}

#[tokio::test]
async fn save_failure_keeps_in_memory_state_authoritative() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1", 500), 1).await;
    repo.fail_saves(true);

    // The mutation still applies for this response
    let cart = store.add(snapshot("m2", "r1", 700), 1).await;
    assert_eq!(cart.lines().len(), 2);

    // But storage still holds the last successful write
    assert_eq!(repo.persisted().map(|c| c.lines().len()), Some(1));
    assert_eq!(repo.save_count(), 1);
}

#[tokio::test]
async fn unreadable_record_loads_as_empty_cart() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1", 500), 2).await;
    repo.fail_loads(true);

    // A malformed/unreadable payload is "no prior cart", never an error
    let cart = store.current().await;
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[tokio::test]
async fn clear_empties_and_cart_remains_usable() {
    let repo = InMemoryCartRepository::new();
    let store = CartStore::new(&repo);

    store.add(snapshot("m1", "r1", 950), 2).await;
    store.add(snapshot("m2", "r2", 425), 3).await;

    let cart = store.clear().await;
    assert_eq!(cart.total_items(), 0);
    assert_eq!(repo.persisted().map(|c| c.is_empty()), Some(true));

    let cart = store.add(snapshot("m3", "r3", 100), 1).await;
    assert_eq!(cart.total_items(), 1);
}
