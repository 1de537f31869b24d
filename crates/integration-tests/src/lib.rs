//! Integration tests for Tavola.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tavola-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart mutations, persistence semantics, and totals
//! - `checkout_gate` - The single-restaurant checkout policy end to end
//!
//! These tests run against [`InMemoryCartRepository`], a fake persistence
//! backend with induced-failure switches, so no database or session layer is
//! needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tavola_core::cart::Cart;
use tavola_storefront::services::CartRepository;

/// Error produced by the fake repository's induced failures.
#[derive(Debug, thiserror::Error)]
#[error("cart storage unavailable")]
pub struct StorageUnavailable;

/// In-memory cart repository for tests.
///
/// Holds one record, like the session store does, and counts writes so
/// tests can assert the one-write-per-mutation contract. Failure switches
/// simulate quota/availability problems on either side of the seam.
#[derive(Default)]
pub struct InMemoryCartRepository {
    record: Mutex<Option<Cart>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
}

impl InMemoryCartRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail (a stored-but-unreadable record).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Peek at the persisted record, as a reloading process would see it.
    ///
    /// # Panics
    ///
    /// Panics if the record mutex is poisoned.
    #[must_use]
    pub fn persisted(&self) -> Option<Cart> {
        self.record.lock().expect("record mutex poisoned").clone()
    }
}

impl CartRepository for &InMemoryCartRepository {
    type Error = StorageUnavailable;

    async fn load(&self) -> Result<Option<Cart>, Self::Error> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        Ok(self.record.lock().expect("record mutex poisoned").clone())
    }

    async fn save(&self, cart: &Cart) -> Result<(), Self::Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        *self.record.lock().expect("record mutex poisoned") = Some(cart.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
