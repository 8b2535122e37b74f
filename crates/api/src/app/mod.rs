//! HTTP application wiring.
//!
//! - `services.rs`: store and token service shared by handlers
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: error-to-response mapping

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(services: services::AppServices) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.tokens().clone(),
    };

    // Gate matched routes only; unknown paths stay 404.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::require_token,
    ));

    routes::public_router().merge(protected).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(Arc::new(services))),
    )
}
