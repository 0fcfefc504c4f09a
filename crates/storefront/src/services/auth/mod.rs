//! Authentication service.
//!
//! Registration and login (the credential verifier) plus session resolution:
//! turning an inbound session token into an identity that is re-read from the
//! `users` table on every request.

mod error;
pub mod token;

use std::future::Future;

pub use error::AuthError;
pub use token::TokenSigner;

use sqlx::PgPool;

use angora_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::SessionUser;
use crate::models::user::UserWithPassword;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt work factor for stored password hashes.
pub const BCRYPT_COST: u32 = 12;

/// Account lookups the auth service needs.
///
/// Implemented by [`UserRepository`] for `PostgreSQL`.
pub trait UserStore: Send + Sync {
    /// Fetch the public projection of a user by ID.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<SessionUser>, RepositoryError>> + Send;

    /// Fetch a user and their password hash by normalized email.
    fn find_with_password(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<UserWithPassword>, RepositoryError>> + Send;

    /// Whether an account already uses this normalized email.
    fn email_exists(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Insert a new `customer` account.
    ///
    /// Must return `RepositoryError::Conflict` when the email is taken.
    fn create(
        &self,
        new_user: NewUser<'_>,
    ) -> impl Future<Output = Result<SessionUser, RepositoryError>> + Send;
}

/// A freshly issued session: the token to put in the cookie and the user it
/// identifies.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}

/// Authentication service.
pub struct AuthService<'a, S> {
    users: S,
    tokens: &'a TokenSigner,
    hash_cost: u32,
}

impl<'a> AuthService<'a, UserRepository<'a>> {
    /// Create an authentication service backed by `PostgreSQL`.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenSigner) -> Self {
        Self::with_store(UserRepository::new(pool), tokens)
    }
}

impl<'a, S> AuthService<'a, S> {
    /// Create an authentication service over any user store.
    #[must_use]
    pub const fn with_store(users: S, tokens: &'a TokenSigner) -> Self {
        Self {
            users,
            tokens,
            hash_cost: BCRYPT_COST,
        }
    }

    #[cfg(test)]
    const fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }
}

impl<S: UserStore> AuthService<'_, S> {
    // =========================================================================
    // Credential verification
    // =========================================================================

    /// Register a new customer account and open a session for it.
    ///
    /// The email is trimmed and lowercased, the display name trimmed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any input is blank.
    /// Returns `AuthError::PasswordTooShort` below eight characters.
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, AuthError> {
        let full_name = full_name.trim();
        if Email::normalize(email).is_empty() || password.is_empty() || full_name.is_empty() {
            return Err(AuthError::MissingFields);
        }

        validate_password(password)?;
        let email = Email::parse(email)?;

        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password.to_owned(), self.hash_cost).await?;

        // The pre-check above is racy; the unique index settles concurrent inserts
        let user = self
            .users
            .create(NewUser {
                email: &email,
                password_hash: &password_hash,
                full_name,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "account registered");
        self.open_session(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if email or password is blank.
    /// Returns `AuthError::InvalidCredentials` for an unknown email, a
    /// malformed email, or a wrong password alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if Email::normalize(email).is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let UserWithPassword {
            user,
            password_hash,
        } = self
            .users
            .find_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password.to_owned(), password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        self.open_session(user)
    }

    // =========================================================================
    // Session resolution
    // =========================================================================

    /// Turn an inbound session token into an authoritative user.
    ///
    /// Returns `Ok(None)` when the token is absent, fails signature or expiry
    /// checks, carries a non-positive subject, or names a user that no longer
    /// exists. The returned user always comes from the database row; claims
    /// embedded in the token are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` only if the user lookup itself fails.
    pub async fn resolve_session(
        &self,
        token: Option<&str>,
    ) -> Result<Option<SessionUser>, AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let Some(user_id) = self.tokens.verify(token) else {
            return Ok(None);
        };

        let user = self.users.find_by_id(user_id).await?;
        if user.is_none() {
            tracing::debug!(%user_id, "stale session: user no longer exists");
        }

        Ok(user)
    }

    fn open_session(&self, user: SessionUser) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Hash a password with bcrypt off the async executor.
async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Verify a password against a stored hash off the async executor.
///
/// An unparseable stored hash counts as a mismatch.
async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    let matches =
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await?;
    Ok(matches)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{Duration, Utc};
    use secrecy::SecretString;

    use angora_core::Role;

    use super::*;

    const TEST_COST: u32 = 4;

    /// In-memory stand-in for the `users` table.
    #[derive(Clone, Default)]
    struct MemoryUsers {
        rows: Arc<Mutex<Vec<UserWithPassword>>>,
    }

    impl MemoryUsers {
        fn delete(&self, id: UserId) {
            self.rows.lock().unwrap().retain(|r| r.user.id != id);
        }

        fn set_role(&self, id: UserId, role: Role) {
            for row in self.rows.lock().unwrap().iter_mut() {
                if row.user.id == id {
                    row.user.role = role;
                }
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    impl UserStore for MemoryUsers {
        async fn find_by_id(&self, id: UserId) -> Result<Option<SessionUser>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
        }

        async fn find_with_password(
            &self,
            email: &Email,
        ) -> Result<Option<UserWithPassword>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| &r.user.email == email).cloned())
        }

        async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().any(|r| &r.user.email == email))
        }

        async fn create(&self, new_user: NewUser<'_>) -> Result<SessionUser, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| &r.user.email == new_user.email) {
                return Err(RepositoryError::Conflict("email already exists".to_owned()));
            }
            let next_id = i32::try_from(rows.len()).unwrap() + 1;
            let user = SessionUser {
                id: UserId::new(next_id),
                email: new_user.email.clone(),
                full_name: new_user.full_name.to_owned(),
                role: Role::Customer,
            };
            rows.push(UserWithPassword {
                user: user.clone(),
                password_hash: new_user.password_hash.to_owned(),
            });
            Ok(user)
        }
    }

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from("Zq8#vL2!pR6$wN0@tY4%kM9&bH3*cJ7^"))
    }

    fn service<'a>(store: &MemoryUsers, tokens: &'a TokenSigner) -> AuthService<'a, MemoryUsers> {
        AuthService::with_store(store.clone(), tokens).with_hash_cost(TEST_COST)
    }

    #[tokio::test]
    async fn test_register_then_login_resolves_same_user() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        let registered = auth.register("a@b.com", "longenough", "A B").await.unwrap();
        assert_eq!(registered.user.email.as_str(), "a@b.com");
        assert_eq!(registered.user.full_name, "A B");
        assert_eq!(registered.user.role, Role::Customer);

        let logged_in = auth.login("a@b.com", "longenough").await.unwrap();
        assert_eq!(logged_in.user, registered.user);

        let resolved = auth
            .resolve_session(Some(&logged_in.token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved, registered.user);
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_name() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        let session = auth
            .register("  Mixed@Case.COM ", "longenough", "  Jane Doe  ")
            .await
            .unwrap();
        assert_eq!(session.user.email.as_str(), "mixed@case.com");
        assert_eq!(session.user.full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_case_insensitively() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        auth.register("a@b.com", "longenough", "A B").await.unwrap();
        let err = auth
            .register(" A@B.COM", "otherpassword", "Someone Else")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_password_length_boundary() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        let err = auth.register("seven@b.com", "1234567", "A B").await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { min: 8 }));

        assert!(auth.register("eight@b.com", "12345678", "A B").await.is_ok());
    }

    #[tokio::test]
    async fn test_password_length_counts_characters_not_bytes() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        // Seven characters, fourteen bytes
        let err = auth.register("u@b.com", "ééééééé", "A B").await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { .. }));
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        for (email, password, name) in [
            ("", "longenough", "A B"),
            ("   ", "longenough", "A B"),
            ("a@b.com", "", "A B"),
            ("a@b.com", "longenough", "   "),
        ] {
            let err = auth.register(email, password, name).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingFields), "{email:?} {name:?}");
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        let err = auth.register("not-an-email", "longenough", "A B").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        auth.register("a@b.com", "longenough", "A B").await.unwrap();
        let row = store
            .find_with_password(&Email::parse("a@b.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_ne!(row.password_hash, "longenough");
        assert!(bcrypt::verify("longenough", &row.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_production_cost_factor() {
        let hash = hash_password("longenough".to_owned(), BCRYPT_COST).await.unwrap();
        assert!(hash.starts_with("$2b$12$"), "unexpected hash prefix: {hash}");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        auth.register("a@b.com", "longenough", "A B").await.unwrap();

        let wrong_password = auth.login("A@B.COM", "wrong").await.unwrap_err();
        let unknown_email = auth.login("nobody@b.com", "longenough").await.unwrap_err();
        let malformed_email = auth.login("nobody", "longenough").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert!(matches!(malformed_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        auth.register("a@b.com", "longenough", "A B").await.unwrap();

        assert!(auth.login(" A@B.COM ", "longenough").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        assert!(matches!(
            auth.login("", "longenough").await.unwrap_err(),
            AuthError::MissingFields
        ));
        assert!(matches!(
            auth.login("a@b.com", "").await.unwrap_err(),
            AuthError::MissingFields
        ));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_invalid_credentials() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        store
            .create(NewUser {
                email: &Email::parse("a@b.com").unwrap(),
                password_hash: "not-a-bcrypt-hash",
                full_name: "A B",
            })
            .await
            .unwrap();

        let err = auth.login("a@b.com", "longenough").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_no_token_is_anonymous() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);

        assert_eq!(auth.resolve_session(None).await.unwrap(), None);
        assert_eq!(auth.resolve_session(Some("")).await.unwrap(), None);
        assert_eq!(auth.resolve_session(Some("garbage")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_token_resolves_to_no_session() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        let session = auth.register("a@b.com", "longenough", "A B").await.unwrap();

        let stale = tokens
            .issue_at(&session.user, Utc::now() - Duration::days(8))
            .unwrap();
        assert_eq!(auth.resolve_session(Some(&stale)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deleted_user_resolves_to_no_session() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        let session = auth.register("a@b.com", "longenough", "A B").await.unwrap();
        assert!(auth.resolve_session(Some(&session.token)).await.unwrap().is_some());

        store.delete(session.user.id);

        assert_eq!(auth.resolve_session(Some(&session.token)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolved_role_comes_from_store_not_token() {
        let store = MemoryUsers::default();
        let tokens = signer();
        let auth = service(&store, &tokens);
        let session = auth.register("a@b.com", "longenough", "A B").await.unwrap();

        // Forge a token whose advisory claims say admin
        let mut forged_claims = session.user.clone();
        forged_claims.role = Role::Admin;
        forged_claims.full_name = "Mallory".to_owned();
        let forged = tokens.issue(&forged_claims).unwrap();

        let resolved = auth.resolve_session(Some(&forged)).await.unwrap().unwrap();
        assert_eq!(resolved.role, Role::Customer);
        assert_eq!(resolved.full_name, "A B");

        // And a role change in the store is visible without a new token
        store.set_role(session.user.id, Role::Admin);
        let resolved = auth.resolve_session(Some(&session.token)).await.unwrap().unwrap();
        assert_eq!(resolved.role, Role::Admin);
    }
}
