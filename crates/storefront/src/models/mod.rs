//! Domain models for the storefront.
//!
//! Row types derive `sqlx::FromRow` directly; JSON shapes are the wire
//! contract consumed by the storefront frontend.

pub mod cart;
pub mod product;
pub mod user;
pub mod wishlist;

pub use cart::{CartLine, Counts};
pub use product::Product;
pub use user::SessionUser;
pub use wishlist::WishlistEntry;
