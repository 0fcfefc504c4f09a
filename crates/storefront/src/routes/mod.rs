//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness
//! GET    /health/ready          - Readiness (database reachable)
//!
//! # Auth
//! POST   /api/auth/register     - Create account, set session cookie
//! POST   /api/auth/login        - Sign in, set session cookie
//! POST   /api/auth/logout       - Clear session cookie
//! GET    /api/auth/me           - Current user (requires auth)
//! GET    /api/me/counts         - Cart / wishlist badge counters
//!
//! # Catalog
//! GET    /api/products          - Active products (?category=homme|femme|accessoires)
//! GET    /api/products/{id}     - Product detail
//! GET    /api/search            - Search (?q=)
//!
//! # Cart (requires auth)
//! GET    /api/cart              - Cart lines
//! POST   /api/cart/add          - Add one unit ({productId})
//! POST   /api/cart/update       - Set quantity ({cartItemId, quantity})
//! POST   /api/cart/remove       - Remove line ({cartItemId})
//! POST   /api/checkout          - Always 501
//!
//! # Wishlist (requires auth)
//! GET    /api/wishlist          - Wishlist entries
//! POST   /api/wishlist/toggle   - Add or remove ({productId})
//! DELETE /api/wishlist/{id}     - Delete entry
//! ```

pub mod account;
pub mod auth;
pub mod body;
pub mod cart;
pub mod health;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::from_fn,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index))
        .route("/toggle", post(wishlist::toggle))
        .route("/{id}", delete(wishlist::delete))
}

/// Create all JSON API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/me/counts", get(account::counts))
        .nest("/products", product_routes())
        .route("/search", get(products::search))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .nest("/wishlist", wishlist_routes())
}

/// Create the full application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .with_state(state)
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http-request",
        method = %request.method(),
        path = request.uri().path(),
        request_id = tracing::field::Empty,
        user_id = tracing::field::Empty,
    )
}
