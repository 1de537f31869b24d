//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /restaurants             - Restaurant listing (optional ?q= search relay)
//! GET  /restaurants/:id         - Restaurant detail (menu + reviews)
//! GET  /meals/:id               - Meal detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add meal (returns count badge, triggers cart-updated)
//! POST /cart/update             - Set line quantity (returns cart_items fragment)
//! POST /cart/remove             - Remove line (returns cart_items fragment)
//! POST /cart/clear              - Empty the cart (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Gated checkout summary
//! POST /checkout                - Submit order to the platform
//!
//! # Auth relay
//! GET  /auth/login              - Login page
//! POST /auth/login              - Relay login to platform
//! GET  /auth/register           - Register page
//! POST /auth/register           - Relay registration to platform
//! POST /auth/logout             - Logout (upstream + local)
//!
//! # Account (requires auth)
//! GET  /account                 - Account overview
//! GET  /account/orders          - Order history
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod meals;
pub mod restaurants;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route_layer(auth_rate_limiter())
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(restaurants::index))
        .route("/restaurants/{id}", get(restaurants::show))
        .route("/meals/{id}", get(meals::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route_layer(api_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .merge(catalog_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout surface
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Account routes
        .nest("/account", account_routes())
        // Auth relay
        .nest("/auth", auth_routes())
}
