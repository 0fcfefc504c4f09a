//! Lenient JSON request bodies.
//!
//! A missing, malformed or mistyped body never turns into an axum rejection:
//! handlers see an all-`None` request and answer with their own 400. The
//! `Content-Type` header is not checked.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// JSON body extractor that falls back to `T::default()` instead of
/// rejecting.
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "unreadable request body");
                T::default()
            }),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "request body not received");
                T::default()
            }
        };

        Ok(Self(body))
    }
}

/// Deserialize an integer field the way a browser client sends it: a JSON
/// number or a numeric string. Anything else becomes `None`.
///
/// # Errors
///
/// Never fails for well-formed JSON; type mismatches map to `None`.
pub fn loose_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_i32))
}

fn value_to_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|i| i32::try_from(i).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
