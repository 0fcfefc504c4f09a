//! Cart route handlers. All of them require a session.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use angora_core::{CartItemId, ProductId};

use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result, messages};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::routes::body::{self, LenientJson};
use crate::state::AppState;

/// Body of `POST /api/cart/add`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    #[serde(default, deserialize_with = "body::loose_i32")]
    pub product_id: Option<i32>,
}

/// Body of `POST /api/cart/update`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default, deserialize_with = "body::loose_i32")]
    pub cart_item_id: Option<i32>,
    #[serde(default, deserialize_with = "body::loose_i32")]
    pub quantity: Option<i32>,
}

/// Body of `POST /api/cart/remove`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    #[serde(default, deserialize_with = "body::loose_i32")]
    pub cart_item_id: Option<i32>,
}

/// The user's cart lines.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<CartLine>>> {
    let lines = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(lines))
}

/// Add one unit of a product.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    LenientJson(req): LenientJson<AddRequest>,
) -> Result<Json<Value>> {
    let product_id = req
        .product_id
        .map(ProductId::new)
        .filter(ProductId::is_positive)
        .ok_or(AppError::BadRequest(messages::INVALID_PRODUCT))?;

    if !ProductRepository::new(state.pool()).exists(product_id).await? {
        return Err(AppError::BadRequest(messages::INVALID_PRODUCT));
    }

    CartRepository::new(state.pool())
        .add(user.id, product_id)
        .await?;

    Ok(Json(json!({ "ok": true })))
}

/// Set a line's quantity (at least 1).
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    LenientJson(req): LenientJson<UpdateRequest>,
) -> Result<Json<Value>> {
    let (Some(cart_item_id), Some(quantity)) = (
        req.cart_item_id.map(CartItemId::new).filter(CartItemId::is_positive),
        req.quantity.filter(|q| *q >= 1),
    ) else {
        return Err(AppError::BadRequest(messages::INVALID_DATA));
    };

    CartRepository::new(state.pool())
        .update_quantity(user.id, cart_item_id, quantity)
        .await?;

    Ok(Json(json!({ "ok": true })))
}

/// Remove a line.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    LenientJson(req): LenientJson<RemoveRequest>,
) -> Result<Json<Value>> {
    let cart_item_id = req
        .cart_item_id
        .map(CartItemId::new)
        .filter(CartItemId::is_positive)
        .ok_or(AppError::BadRequest(messages::INVALID_DATA))?;

    CartRepository::new(state.pool())
        .remove(user.id, cart_item_id)
        .await?;

    Ok(Json(json!({ "ok": true })))
}

/// Checkout is switched off until a payment provider is wired in.
pub async fn checkout() -> AppError {
    AppError::NotImplemented(messages::CHECKOUT_DISABLED)
}
