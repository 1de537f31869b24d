//! Database access for storefront `PostgreSQL`.
//!
//! # Database: `tavola_storefront`
//!
//! The platform API is source of truth for all commerce data; the local
//! database holds only the tower-sessions storage (which in turn carries the
//! shopper's cart record and relayed platform session token).
//!
//! # Migrations
//!
//! Run via:
//! ```bash
//! cargo run -p tavola-cli -- migrate storefront
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
