//! Session token issuance and verification (HS256 JWT).
//!
//! The token subject is the user ID. Email, display name and role are copied
//! into the payload for client convenience only; [`TokenSigner::verify`] does
//! not even deserialize them.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use angora_core::{Role, UserId};

use crate::models::SessionUser;

/// Token lifetime in days. Matches the session cookie max-age.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Claims written into every session token.
#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    sub: String,
    iat: i64,
    exp: i64,
    // Advisory copies, never read back by the server.
    email: &'a str,
    full_name: &'a str,
    role: Role,
}

/// The only claim the server trusts.
#[derive(Debug, Deserialize)]
struct SubjectClaims {
    sub: String,
}

/// Signs and verifies session tokens with the server secret.
///
/// Built once at startup from `AUTH_SECRET` and shared through `AppState`.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
            ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Issue a token for `user`, valid for seven days from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be encoded.
    pub fn issue(&self, user: &SessionUser) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be encoded.
    pub fn issue_at(
        &self,
        user: &SessionUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = IssuedClaims {
            sub: user.id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            email: user.email.as_str(),
            full_name: &user.full_name,
            role: user.role,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify signature and expiry and return the subject.
    ///
    /// Returns `None` for a bad signature, an expired token, a malformed
    /// token, or a subject that is not a positive integer. The cause is only
    /// logged at debug level.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let data = match jsonwebtoken::decode::<SubjectClaims>(
            token,
            &self.decoding,
            &self.validation,
        ) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                return None;
            }
        };

        let id = UserId::parse_positive(&data.claims.sub);
        if id.is_none() {
            tracing::debug!("session token subject is not a positive id");
        }
        id
    }
}
