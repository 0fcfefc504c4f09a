//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! angora-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! Reads the same `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`
//! variables as the storefront server (`.env` is honored). `AUTH_SECRET` is
//! not needed.
//!
//! # Migration Files
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the binary at compile time.

use angora_storefront::config::{ConfigError, DatabaseConfig};
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Database settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending storefront migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration, connection or any migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = DatabaseConfig::from_env()?;

    tracing::info!(host = %config.host, database = %config.name, "Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.connect_options())
        .await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
