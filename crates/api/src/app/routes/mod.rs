use axum::{
    routing::{get, post},
    Router,
};

pub mod admin;
pub mod authorize;
pub mod common;
pub mod policies;
pub mod roles;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/authorize", post(authorize::authorize))
        .nest("/roles", roles::router())
        .nest("/policies", policies::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
}
