//! Catalog queries.

use sqlx::PgPool;

use angora_core::{Category, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Maximum number of search hits returned.
pub const SEARCH_LIMIT: i64 = 48;

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, optionally within one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<Category>) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price_cents, image_url, category
            FROM products
            WHERE is_active AND ($1::text IS NULL OR category = $1)
            ORDER BY id DESC
            ",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a single active product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price_cents, image_url, category
            FROM products
            WHERE id = $1 AND is_active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Whether a product row with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    /// Case-insensitive substring search over name and description.
    ///
    /// A blank query matches every active product, so the result is the
    /// newest `SEARCH_LIMIT` items of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let query = query.trim();
        let pattern = format!("%{}%", escape_like(query));

        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price_cents, image_url, category
            FROM products
            WHERE is_active AND ($1 = '' OR name ILIKE $2 OR description ILIKE $2)
            ORDER BY id DESC
            LIMIT $3
            ",
        )
        .bind(query)
        .bind(pattern)
        .bind(SEARCH_LIMIT)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
///
/// Uses backslash, the `PostgreSQL` default escape character.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
