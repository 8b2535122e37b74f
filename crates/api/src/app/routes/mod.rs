use axum::{Router, routing::get};

pub mod login;
pub mod orders;
pub mod products;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/products", products::router())
        .merge(login::router())
}

/// Endpoints behind the token gate.
pub fn protected_router() -> Router {
    Router::new().merge(orders::router())
}
