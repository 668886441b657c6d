use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use warden_infra::resolve_roles;

use crate::app::{errors, services::AppServices};
use crate::context::ActorContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    let snapshot = match services.directory.snapshot() {
        Ok(s) => s,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let actor = actor.actor();
    let mut roles: Vec<String> = resolve_roles(&snapshot, actor.id, Utc::now())
        .into_iter()
        .filter_map(|id| snapshot.role(id).map(|r| r.name.clone()))
        .collect();
    roles.sort();

    Json(serde_json::json!({
        "id": actor.id.to_string(),
        "username": actor.username,
        "email": actor.email,
        "roles": roles,
    }))
    .into_response()
}
