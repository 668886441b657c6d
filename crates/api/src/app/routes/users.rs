use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use warden_core::{RoleId, UserId};
use warden_infra::RequestContext;

use crate::app::routes::common::guard;
use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_user))
        .route("/:id/roles", post(assign_role))
        .route("/:id/roles/:role_id", delete(revoke_role))
}

/// POST /users - ingest a user from the identity subsystem (upsert).
pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::RegisterUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard(&services, &actor, &ctx, "users:Register", "*") {
        return resp;
    }

    let user_id = body.id.unwrap_or_default();
    match services
        .directory
        .register_user(user_id, body.username, body.email)
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": user.id.to_string(),
                "username": user.username,
                "email": user.email,
                "is_active": user.is_active,
            })),
        )
            .into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn assign_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AssignRoleRequest>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Assign", &format!("users/{user_id}")) {
        return resp;
    }

    match services
        .directory
        .assign_role(user_id, body.role_id, Some(actor.actor().id), body.expires_at)
    {
        Ok(edge) => (StatusCode::CREATED, Json(dto::assignment_to_json(&edge))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn revoke_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, role_id)): Path<(String, String)>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };
    let role_id: RoleId = match role_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid role id"),
    };

    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Revoke", &format!("users/{user_id}")) {
        return resp;
    }

    match services.directory.revoke_role(user_id, role_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}
