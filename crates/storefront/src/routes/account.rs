//! Per-user header data.

use axum::{Json, extract::State};

use crate::db::cart::CartRepository;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::Counts;
use crate::state::AppState;

/// Cart and wishlist badge counters. Anonymous visitors get zeros.
pub async fn counts(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<Counts>> {
    let Some(user) = user else {
        return Ok(Json(Counts::default()));
    };

    let counts = CartRepository::new(state.pool()).counts(user.id).await?;
    Ok(Json(counts))
}
