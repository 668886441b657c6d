//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (directory, audit pipeline, engine)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> Router {
    let services = Arc::new(services::build_services());
    build_app_with_services(jwt_secret, services)
}

/// Build the router around already-wired services.
///
/// Tests use this to seed the directory (users, role grants) before the
/// server starts taking requests.
pub fn build_app_with_services(jwt_secret: String, services: Arc<services::AppServices>) -> Router {
    let jwt = Arc::new(warden_authz::Hs256JwtValidator::new(jwt_secret));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a verified bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
