//! Integration tests for Angora.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the storefront
//! cargo run -p angora-cli -- migrate
//! cargo run -p angora-storefront
//!
//! # Run the ignored end-to-end tests against it
//! cargo test -p angora-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` overrides the server address. Database fixtures use
//! the same `DB_*` variables as the server.

use angora_core::Category;
use angora_storefront::config::DatabaseConfig;
use reqwest::Client;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client that keeps cookies between requests, like a browser.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run will have used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@angora.test", Uuid::new_v4().simple())
}

/// Connect to the storefront database for fixtures and assertions.
///
/// # Panics
///
/// Panics if the database settings are invalid or the database is unreachable.
#[allow(clippy::expect_used)]
pub async fn database() -> PgPool {
    let config = DatabaseConfig::from_env().expect("Invalid DB_* configuration");
    angora_storefront::db::create_pool(&config)
        .await
        .expect("Failed to connect to database")
}

/// Insert an active product and return its ID.
///
/// # Panics
///
/// Panics if the insert fails.
#[allow(clippy::expect_used)]
pub async fn insert_product(pool: &PgPool, name: &str, category: Category) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO products (name, description, price_cents, category) \
         VALUES ($1, 'integration fixture', 4900, $2) RETURNING id",
    )
    .bind(name)
    .bind(category)
    .fetch_one(pool)
    .await
    .expect("Failed to insert product")
}
