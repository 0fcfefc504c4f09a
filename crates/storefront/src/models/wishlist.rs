//! Wishlist entry.

use serde::Serialize;

use angora_core::{Category, ProductId, WishlistItemId};

/// A wishlist row joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
    pub category: Category,
    pub in_stock: bool,
}
