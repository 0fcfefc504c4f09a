//! User repository for database operations.

use sqlx::PgPool;

use angora_core::{Email, UserId};

use super::RepositoryError;
use crate::models::SessionUser;
use crate::models::user::UserWithPassword;
use crate::services::UserStore;

/// Input for inserting a new account. The role is always `customer`.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub full_name: &'a str,
}

/// Repository for user database operations.
#[derive(Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<SessionUser>, RepositoryError> {
        let user = sqlx::query_as::<_, SessionUser>(
            "SELECT id, email, full_name, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user with their password hash by normalized email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<UserWithPassword>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, full_name, role, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Check whether an account already uses this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<SessionUser, RepositoryError> {
        let user = sqlx::query_as::<_, SessionUser>(
            r"
            INSERT INTO users (email, password_hash, full_name, role)
            VALUES ($1, $2, $3, 'customer')
            RETURNING id, email, full_name, role
            ",
        )
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))?;

        Ok(user)
    }
}

impl UserStore for UserRepository<'_> {
    async fn find_by_id(&self, id: UserId) -> Result<Option<SessionUser>, RepositoryError> {
        self.get_by_id(id).await
    }

    async fn find_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<UserWithPassword>, RepositoryError> {
        self.get_with_password(email).await
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        self.exists_by_email(email).await
    }

    async fn create(&self, new_user: NewUser<'_>) -> Result<SessionUser, RepositoryError> {
        Self::create(self, new_user).await
    }
}
