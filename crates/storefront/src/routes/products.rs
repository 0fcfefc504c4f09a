//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use angora_core::{Category, ProductId};

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result, messages};
use crate::models::Product;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
}

/// Query parameters for search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Active products, newest first, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>> {
    let category = match params.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|_| AppError::BadRequest(messages::INVALID_CATEGORY))?,
        ),
    };

    let products = ProductRepository::new(state.pool()).list(category).await?;
    Ok(Json(products))
}

/// A single active product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::parse_positive(&id).ok_or(AppError::NotFound)?;

    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// Name/description search. A blank query lists the newest products.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>> {
    let query = params.q.unwrap_or_default();
    let products = ProductRepository::new(state.pool()).search(&query).await?;
    Ok(Json(products))
}
