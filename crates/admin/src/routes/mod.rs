//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (admin) or redirect to /orders (provider)
//! GET  /health                  - Health check
//!
//! # Auth relay
//! GET  /auth/login              - Login page
//! POST /auth/login              - Relay operator login to platform
//! POST /auth/logout             - Logout (upstream + local)
//!
//! # Provider console
//! GET  /meals                   - Own menu
//! GET  /meals/new               - New meal form
//! POST /meals                   - Relay meal creation
//! GET  /meals/:id/edit          - Edit meal form
//! POST /meals/:id               - Relay meal update
//! POST /meals/:id/delete        - Relay meal deletion
//! GET  /orders                  - Incoming orders
//! POST /orders/:id/status       - Relay status change
//! ```

pub mod auth;
pub mod dashboard;
pub mod meals;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/meals", get(meals::index).post(meals::create))
        .route("/meals/new", get(meals::new_form))
        .route("/meals/{id}", post(meals::update))
        .route("/meals/{id}/edit", get(meals::edit_form))
        .route("/meals/{id}/delete", post(meals::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
}
