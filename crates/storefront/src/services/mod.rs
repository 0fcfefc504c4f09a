//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Credential verification, session token issuance and session
//!   resolution

pub mod auth;

pub use auth::{AuthError, AuthService, AuthSession, TokenSigner, UserStore};
