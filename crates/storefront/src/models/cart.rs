//! Cart line and badge counters.

use serde::Serialize;

use angora_core::{CartItemId, ProductId};

/// A cart row joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub cart_item_id: CartItemId,
    pub quantity: i32,
    pub product_id: ProductId,
    pub name: String,
    pub price_cents: i32,
    pub image_url: Option<String>,
}

/// Header badge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Sum of cart quantities.
    pub cart_count: i64,
    /// Number of wishlist rows.
    pub wishlist_count: i64,
}
