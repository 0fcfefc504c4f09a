//! Authentication extractors.
//!
//! Both extractors read the session cookie and run the session resolver, so
//! every authenticated request re-confirms the user against the database.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use crate::error::{AppError, set_sentry_user};
use crate::middleware::session::session_token;
use crate::models::SessionUser;
use crate::state::AppState;

/// Resolve the session carried by the request, if any.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<SessionUser>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let user = state.auth().resolve_session(session_token(&jar)).await?;

    if let Some(user) = &user {
        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        set_sentry_user(&user.id);
    }

    Ok(user)
}

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 `{"error":"UNAUTHENTICATED"}` when the cookie is absent,
/// invalid, expired, or names a user that no longer exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireAuth(pub SessionUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve(parts, &state)
            .await?
            .map(Self)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject anonymous requests. It only
/// fails if the user lookup itself fails.
pub struct OptionalAuth(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve(parts, &state).await.map(Self)
    }
}
