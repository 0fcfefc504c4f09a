//! User domain types.

use serde::Serialize;

use angora_core::{Email, Role, UserId};

/// Public-safe projection of a user account.
///
/// This is what the session resolver hands to route handlers and what the
/// auth endpoints return. It never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct SessionUser {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized (trimmed, lowercase) email.
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// Authoritative role from the `users` row.
    pub role: Role,
}

/// A user row together with its stored bcrypt hash, used only by login.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: SessionUser,
    pub password_hash: String,
}
