//! Core types for Angora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod role;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleError};
