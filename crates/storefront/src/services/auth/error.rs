//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// Variants that reach the client are deliberately coarse: every credential
/// failure is `InvalidCredentials`, whatever the underlying cause.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email, password or display name missing.
    #[error("missing fields")]
    MissingFields,

    /// Password shorter than the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length, in characters.
        min: usize,
    },

    /// Registration email is structurally invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] angora_core::EmailError),

    /// An account already uses this normalized email.
    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password (intentionally indistinguishable).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Session token could not be signed.
    #[error("token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
