//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error body is `{"error": <message-or-code>}`. The French messages are
//! shown verbatim by the storefront frontend; the upper-case codes are matched
//! on by client code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// No resolved session on a route that requires one.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Bad request from client; the payload is the client-facing code.
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    /// Feature intentionally switched off; the payload is the client-facing code.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Client-facing messages.
pub mod messages {
    pub const MISSING_FIELDS: &str = "Champs manquants";
    pub const PASSWORD_TOO_SHORT: &str = "Mot de passe trop court (min 8)";
    pub const INVALID_EMAIL: &str = "Email invalide";
    pub const EMAIL_TAKEN: &str = "Email déjà utilisé";
    pub const INVALID_CREDENTIALS: &str = "Identifiants invalides";
    pub const SERVER_ERROR: &str = "Erreur serveur";

    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_PRODUCT: &str = "INVALID_PRODUCT";
    pub const INVALID_DATA: &str = "INVALID_DATA";
    pub const INVALID_ID: &str = "INVALID_ID";
    pub const INVALID_CATEGORY: &str = "INVALID_CATEGORY";
    pub const CHECKOUT_DISABLED: &str = "CHECKOUT_DISABLED";
}

impl AppError {
    /// Whether this error is a server-side failure rather than a client mistake.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::PasswordHash(_)
                    | AuthError::Token(_)
                    | AuthError::Task(_)
                    | AuthError::Repository(_)
            ),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    // Don't expose internal error details to clients
    fn client_message(&self) -> &'static str {
        if self.is_server_error() {
            return messages::SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::PasswordTooShort { .. } => messages::PASSWORD_TOO_SHORT,
                AuthError::InvalidEmail(_) => messages::INVALID_EMAIL,
                AuthError::EmailTaken => messages::EMAIL_TAKEN,
                AuthError::InvalidCredentials => messages::INVALID_CREDENTIALS,
                _ => messages::MISSING_FIELDS,
            },
            Self::Unauthenticated => messages::UNAUTHENTICATED,
            Self::NotFound => messages::NOT_FOUND,
            Self::BadRequest(code) | Self::NotImplemented(code) => *code,
            _ => messages::SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "error": self.client_message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
