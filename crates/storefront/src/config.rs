//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AUTH_SECRET` - Session token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `ANGORA_ENV` - `production` or `development` (default: development).
//!   Production marks the session cookie `Secure`.
//! - `ANGORA_HOST` - Bind address (default: 127.0.0.1)
//! - `ANGORA_PORT` - Listen port (default: 3000)
//! - `DB_HOST` - `PostgreSQL` host (default: 127.0.0.1)
//! - `DB_PORT` - `PostgreSQL` port (default: 5432)
//! - `DB_USER` - `PostgreSQL` user (default: postgres)
//! - `DB_PASSWORD` - `PostgreSQL` password (default: empty)
//! - `DB_NAME` - Database name (default: angora)
//! - `DB_POOL_SIZE` - Maximum pooled connections (default: 10)
//! - `DB_CONNECT_TIMEOUT_MS` - Connection acquire timeout (default: 3000)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const MIN_AUTH_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "test" => Ok(Self::Development),
            other => Err(ConfigError::InvalidEnvVar(
                "ANGORA_ENV".to_string(),
                format!("expected production or development, got '{other}'"),
            )),
        }
    }

    /// Whether the session cookie must carry the `Secure` attribute.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Session token signing secret
    pub auth_secret: SecretString,
    /// Database connection parameters
    pub database: DatabaseConfig,
    /// Emit JSON logs instead of human-readable text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// `PostgreSQL` connection parameters.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    /// Upper bound on concurrently open connections
    pub pool_size: u32,
    /// How long to wait for a connection before failing the request
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    /// Load only the `DB_*` variables (used by the CLI, which needs no secret).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the pool size is 0.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the `DB_*` variables through an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DatabaseConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database = Self {
            host: env.or_default("DB_HOST", "127.0.0.1"),
            port: env.parsed::<u16>("DB_PORT", "5432")?,
            user: env.or_default("DB_USER", "postgres"),
            password: SecretString::from(env.or_default("DB_PASSWORD", "")),
            name: env.or_default("DB_NAME", "angora"),
            pool_size: env.parsed::<u32>("DB_POOL_SIZE", "10")?,
            connect_timeout: Duration::from_millis(
                env.parsed::<u64>("DB_CONNECT_TIMEOUT_MS", "3000")?,
            ),
        };
        if database.pool_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DB_POOL_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(database)
    }

    /// Build sqlx connect options from the individual parameters.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `AUTH_SECRET` is missing or fails validation
    /// (length, placeholder detection, entropy check), or if any variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parsed::<IpAddr>("ANGORA_HOST", "127.0.0.1")?;
        let port = env.parsed::<u16>("ANGORA_PORT", "3000")?;
        let environment = Environment::parse(&env.or_default("ANGORA_ENV", "development"))?;

        let auth_secret = SecretString::from(env.required("AUTH_SECRET")?);
        validate_auth_secret(&auth_secret, "AUTH_SECRET")?;
        validate_secret_strength(auth_secret.expose_secret(), "AUTH_SECRET")?;

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let json_logs = env
            .optional("LOG_FORMAT")
            .is_some_and(|v| v.eq_ignore_ascii_case("json"));
        let sentry_dsn = env.optional("SENTRY_DSN").filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            environment,
            auth_secret,
            database,
            json_logs,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed accessors over a variable lookup.
struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Validate that the signing secret meets minimum length requirements.
fn validate_auth_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_AUTH_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_AUTH_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
