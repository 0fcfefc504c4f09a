//! Authentication route handlers.
//!
//! Successful register and login set the `angora_session` cookie and echo the
//! public user projection. Logout only drops the cookie; there is no
//! server-side session to destroy.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_session, set_session};
use crate::routes::body::LenientJson;
use crate::services::AuthSession;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Create a customer account and sign it in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    LenientJson(req): LenientJson<RegisterRequest>,
) -> Result<(CookieJar, Json<Value>)> {

    let session = state
        .auth()
        .register(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
            req.full_name.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(signed_in(&state, jar, session))
}

/// Sign in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    LenientJson(req): LenientJson<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {

    let session = state
        .auth()
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "login rejected"))?;

    tracing::info!(user_id = %session.user.id, "user logged in");
    Ok(signed_in(&state, jar, session))
}

/// Drop the session cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    clear_sentry_user();
    let secure = state.config().environment.is_production();
    (clear_session(jar, secure), Json(json!({ "ok": true })))
}

/// The user behind the current session.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<Value> {
    Json(json!({ "user": user }))
}

fn signed_in(state: &AppState, jar: CookieJar, session: AuthSession) -> (CookieJar, Json<Value>) {
    let AuthSession { token, user } = session;
    set_sentry_user(&user.id);

    let secure = state.config().environment.is_production();
    let jar = set_session(jar, token, secure);
    (jar, Json(json!({ "ok": true, "user": user })))
}
