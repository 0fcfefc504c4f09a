//! Catalog product.

use serde::Serialize;

use angora_core::{Category, ProductId};

/// An active product as listed in the catalog and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub image_url: Option<String>,
    pub category: Category,
}
