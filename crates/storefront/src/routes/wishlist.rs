//! Wishlist route handlers. All of them require a session.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use angora_core::{ProductId, WishlistItemId};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::wishlist::WishlistRepository;
use crate::error::{AppError, Result, messages};
use crate::middleware::RequireAuth;
use crate::models::WishlistEntry;
use crate::routes::body::{self, LenientJson};
use crate::state::AppState;

/// Body of `POST /api/wishlist/toggle`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    #[serde(default, deserialize_with = "body::loose_i32")]
    pub product_id: Option<i32>,
}

/// The user's wishlist, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<WishlistEntry>>> {
    let entries = WishlistRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(entries))
}

/// Add or remove a product.
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    LenientJson(req): LenientJson<ToggleRequest>,
) -> Result<Json<Value>> {
    let product_id = req
        .product_id
        .map(ProductId::new)
        .filter(ProductId::is_positive)
        .ok_or(AppError::BadRequest(messages::INVALID_PRODUCT))?;

    if !ProductRepository::new(state.pool()).exists(product_id).await? {
        return Err(AppError::BadRequest(messages::INVALID_PRODUCT));
    }

    let wished = WishlistRepository::new(state.pool())
        .toggle(user.id, product_id)
        .await?;

    Ok(Json(json!({ "ok": true, "wished": wished })))
}

/// Delete one entry by its wishlist row ID.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = WishlistItemId::parse_positive(&id)
        .ok_or(AppError::BadRequest(messages::INVALID_ID))?;

    match WishlistRepository::new(state.pool()).delete(user.id, id).await {
        Ok(()) => Ok(Json(json!({ "ok": true }))),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound),
        Err(e) => Err(e.into()),
    }
}
