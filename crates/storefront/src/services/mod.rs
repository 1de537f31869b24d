//! Application services for the storefront.

pub mod cart;

pub use cart::{CartRepository, CartStore, SessionCartRepository};
