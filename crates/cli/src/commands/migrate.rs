//! Database migration commands.
//!
//! Each app database holds only tower-sessions storage (the platform API
//! owns all commerce data), so "migrating" means creating the sessions
//! schema the store expects.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for storefront
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur during migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Set up the storefront session store.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the schema migration
/// fails.
pub async fn storefront() -> Result<(), MigrationError> {
    migrate_sessions("STOREFRONT_DATABASE_URL", "storefront").await
}

/// Set up the admin session store.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the schema migration
/// fails.
pub async fn admin() -> Result<(), MigrationError> {
    migrate_sessions("ADMIN_DATABASE_URL", "admin").await
}

async fn migrate_sessions(env_var: &'static str, label: &str) -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var(env_var).map_err(|_| MigrationError::MissingEnvVar(env_var))?;

    tracing::info!("Connecting to {label} database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running {label} session-store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("{label} migrations complete");
    Ok(())
}
