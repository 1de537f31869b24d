//! Cart store: pure cart mutations plus a persistence side channel.
//!
//! The cart model itself ([`tavola_core::cart::Cart`]) is pure and
//! synchronous; this module owns its durability. `CartStore` loads the
//! persisted record, applies one mutation, and writes the record back in
//! full - one write per mutation, including batch adds.
//!
//! Persistence failures are deliberately non-fatal: the in-memory result of
//! the mutation stays authoritative for the response and the failure is only
//! logged, never surfaced to the shopper. A persisted payload that fails to
//! deserialize is treated as "no prior cart", not a startup error.

use tower_sessions::Session;
use tracing::warn;

use tavola_core::cart::{Cart, MealSnapshot};
use tavola_core::types::MealId;

use crate::models::session_keys;

/// Persistence seam for the cart record.
///
/// `load` returns `Ok(None)` when no record exists. Implementations map
/// "stored but unreadable" to an error; the store downgrades both cases to
/// an empty cart.
#[allow(async_fn_in_trait)] // only generic (static-dispatch) consumers exist
pub trait CartRepository {
    type Error: std::error::Error;

    /// Read the persisted cart record, if any.
    async fn load(&self) -> Result<Option<Cart>, Self::Error>;

    /// Replace the persisted cart record with the given state.
    async fn save(&self, cart: &Cart) -> Result<(), Self::Error>;
}

/// Cart record store backed by the shopper's server-side session.
///
/// The session is the storefront's durable per-device storage; the cart
/// lives under the fixed [`session_keys::CART`] key and survives reloads
/// and navigation for the lifetime of the session cookie.
#[derive(Clone)]
pub struct SessionCartRepository {
    session: Session,
}

impl SessionCartRepository {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartRepository for SessionCartRepository {
    type Error = tower_sessions::session::Error;

    async fn load(&self) -> Result<Option<Cart>, Self::Error> {
        self.session.get::<Cart>(session_keys::CART).await
    }

    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        self.session.insert(session_keys::CART, cart).await
    }
}

/// The authoritative cart state holder for one request.
///
/// Constructed per request with an injected repository, so the mutation
/// logic is testable against a fake with no real storage behind it. Every
/// mutation returns the resulting cart so handlers can render it without a
/// second load.
pub struct CartStore<R> {
    repo: R,
}

impl CartStore<SessionCartRepository> {
    /// Store over the shopper's session, as used by every route handler.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self::new(SessionCartRepository::new(session.clone()))
    }
}

impl<R: CartRepository> CartStore<R> {
    #[must_use]
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current cart state.
    ///
    /// Absent or unreadable records both come back as an empty cart; a
    /// malformed payload is logged and discarded rather than failing the
    /// request.
    pub async fn current(&self) -> Cart {
        match self.repo.load().await {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!("Discarding unreadable cart record: {e}");
                Cart::new()
            }
        }
    }

    /// Add `quantity` units of a meal and persist.
    ///
    /// One persistence write regardless of the quantity - a batch add from
    /// a detail page is a single call, not N unit adds.
    pub async fn add(&self, meal: MealSnapshot, quantity: u32) -> Cart {
        self.mutate(|cart| cart.add(meal, quantity)).await
    }

    /// Set a line's quantity (zero removes the line) and persist.
    pub async fn set_quantity(&self, meal_id: &MealId, quantity: u32) -> Cart {
        self.mutate(|cart| cart.set_quantity(meal_id, quantity))
            .await
    }

    /// Remove a line and persist. No-op if the meal is absent.
    pub async fn remove(&self, meal_id: &MealId) -> Cart {
        self.mutate(|cart| cart.remove(meal_id)).await
    }

    /// Empty the cart and persist. Called by the shopper's clear action and
    /// by the checkout flow after the platform confirms an order.
    pub async fn clear(&self) -> Cart {
        self.mutate(Cart::clear).await
    }

    /// Load, apply one mutation, persist, and return the result.
    ///
    /// The in-memory state remains authoritative when the write fails; the
    /// failure is logged and swallowed by design.
    async fn mutate(&self, apply: impl FnOnce(&mut Cart)) -> Cart {
        let mut cart = self.current().await;
        apply(&mut cart);

        if let Err(e) = self.repo.save(&cart).await {
            warn!("Failed to persist cart record (keeping in-memory state): {e}");
        }

        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;

    use tavola_core::types::RestaurantId;

    use super::*;

    /// Fake repository over a mutex-held record, with switches for the
    /// failure modes the store must absorb.
    #[derive(Default)]
    struct FakeRepository {
        record: Mutex<Option<Cart>>,
        fail_saves: bool,
        fail_loads: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("storage unavailable")]
    struct StorageUnavailable;

    impl CartRepository for FakeRepository {
        type Error = StorageUnavailable;

        async fn load(&self) -> Result<Option<Cart>, Self::Error> {
            if self.fail_loads {
                return Err(StorageUnavailable);
            }
            Ok(self.record.lock().unwrap().clone())
        }

        async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
            if self.fail_saves {
                return Err(StorageUnavailable);
            }
            *self.record.lock().unwrap() = Some(cart.clone());
            Ok(())
        }
    }

    fn snapshot(meal_id: &str, restaurant_id: &str) -> MealSnapshot {
        MealSnapshot {
            meal_id: MealId::new(meal_id),
            name: meal_id.to_owned(),
            unit_price: Decimal::new(950, 2),
            image_url: None,
            restaurant_id: RestaurantId::new(restaurant_id),
            restaurant_name: None,
        }
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let store = CartStore::new(FakeRepository::default());
        let cart = store.current().await;

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_mutations_persist_after_every_write() {
        let store = CartStore::new(FakeRepository::default());

        store.add(snapshot("m1", "r1"), 2).await;
        let cart = store.current().await;
        assert_eq!(cart.total_items(), 2);

        store.set_quantity(&MealId::new("m1"), 5).await;
        assert_eq!(store.current().await.total_items(), 5);

        store.remove(&MealId::new("m1")).await;
        assert!(store.current().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_non_fatal() {
        let repo = FakeRepository {
            fail_saves: true,
            ..FakeRepository::default()
        };
        let store = CartStore::new(repo);

        // The returned cart reflects the mutation even though nothing was
        // persisted
        let cart = store.add(snapshot("m1", "r1"), 1).await;
        assert_eq!(cart.total_items(), 1);

        // A reload sees the unpersisted (empty) record
        assert!(store.current().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_record_treated_as_empty() {
        let repo = FakeRepository {
            fail_loads: true,
            ..FakeRepository::default()
        };
        let store = CartStore::new(repo);

        assert!(store.current().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_persists_empty_record() {
        let store = CartStore::new(FakeRepository::default());
        store.add(snapshot("m1", "r1"), 3).await;

        let cart = store.clear().await;
        assert!(cart.is_empty());
        assert!(store.current().await.is_empty());
    }
}
