//! Angora storefront library.
//!
//! JSON API for the Angora shop: catalog, cart, wishlist, and cookie-carried
//! session tokens that are re-checked against the `users` table on every
//! request. The binary in `main.rs` only wires configuration, logging and the
//! listener around [`routes::app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
