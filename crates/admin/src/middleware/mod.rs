//! HTTP middleware for the admin console.

pub mod auth;
pub mod session;

pub use auth::{RequireOperator, clear_current_operator, platform_token, set_current_operator};
pub use session::create_session_layer;
