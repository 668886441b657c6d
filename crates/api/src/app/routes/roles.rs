use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use warden_core::{PolicyId, RoleId};
use warden_infra::RequestContext;

use crate::app::routes::common::guard;
use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", delete(delete_role))
        .route("/:id/policies", axum::routing::post(attach_policy))
        .route("/:id/policies/:policy_id", delete(detach_policy))
}

pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    if let Err(resp) = guard(&services, &actor, &ctx, "roles:List", "*") {
        return resp;
    }

    let roles = match services.directory.list_roles() {
        Ok(r) => r,
        Err(e) => return errors::directory_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "roles": roles.iter().map(dto::role_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreateRoleRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Create", "*") {
        return resp;
    }

    match services.directory.create_role(body.name, false) {
        Ok(role) => (StatusCode::CREATED, Json(dto::role_to_json(&role))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let role_id: RoleId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid role id"),
    };

    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Delete", &format!("roles/{role_id}")) {
        return resp;
    }

    match services.directory.delete_role(role_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn attach_policy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AttachPolicyRequest>,
) -> axum::response::Response {
    let role_id: RoleId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid role id"),
    };

    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Attach", &format!("roles/{role_id}")) {
        return resp;
    }

    match services.directory.attach_policy(role_id, body.policy_id) {
        Ok(edge) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "role_id": edge.role_id.to_string(),
                "policy_id": edge.policy_id.to_string(),
                "assigned_at": edge.assigned_at.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn detach_policy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, policy_id)): Path<(String, String)>,
) -> axum::response::Response {
    let role_id: RoleId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid role id"),
    };
    let policy_id: PolicyId = match policy_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid policy id")
        }
    };

    if let Err(resp) = guard(&services, &actor, &ctx, "roles:Detach", &format!("roles/{role_id}")) {
        return resp;
    }

    match services.directory.detach_policy(role_id, policy_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}
