use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};

use warden_core::PolicyId;
use warden_infra::RequestContext;

use crate::app::routes::common::guard;
use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_policies).post(create_policy))
        .route("/:id", delete(delete_policy))
}

pub async fn list_policies(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    if let Err(resp) = guard(&services, &actor, &ctx, "policies:List", "*") {
        return resp;
    }

    let policies = match services.directory.list_policies() {
        Ok(p) => p,
        Err(e) => return errors::directory_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "policies": policies.iter().map(dto::policy_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

pub async fn create_policy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreatePolicyRequest>,
) -> axum::response::Response {
    if let Err(resp) = guard(&services, &actor, &ctx, "policies:Create", "*") {
        return resp;
    }

    match services.directory.create_policy(body.name, &body.document, false) {
        Ok(policy) => (StatusCode::CREATED, Json(dto::policy_to_json(&policy))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_policy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let policy_id: PolicyId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid policy id")
        }
    };

    if let Err(resp) = guard(
        &services,
        &actor,
        &ctx,
        "policies:Delete",
        &format!("policies/{policy_id}"),
    ) {
        return resp;
    }

    match services.directory.delete_policy(policy_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}
