//! Cart queries. Every statement is scoped to the owning user.

use sqlx::PgPool;

use angora_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, Counts};

/// Repository for per-user cart rows.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Cart lines joined with their products, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.id AS cart_item_id, ci.quantity, p.id AS product_id,
                   p.name, p.price_cents, p.image_url
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add one unit of a product, creating the line if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + 1
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set the quantity of one of the user's lines.
    ///
    /// A line owned by someone else is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        cart_item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3")
            .bind(quantity)
            .bind(cart_item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Remove one of the user's lines.
    ///
    /// A line owned by someone else is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        cart_item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(cart_item_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Cart quantity total and wishlist size for the header badges.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self, user_id: UserId) -> Result<Counts, RepositoryError> {
        let (cart_count, wishlist_count): (i64, i64) = sqlx::query_as(
            r"
            SELECT
                (SELECT COALESCE(SUM(quantity), 0)::bigint FROM cart_items WHERE user_id = $1),
                (SELECT COUNT(*) FROM wishlist_items WHERE user_id = $1)
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(Counts {
            cart_count,
            wishlist_count,
        })
    }
}
