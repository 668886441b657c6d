use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use warden_infra::RequestContext;

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

/// POST /authorize - evaluate an action/resource pair for the calling actor.
///
/// Always 200 for a completed evaluation; the decision is in the body. Any
/// authenticated actor may ask about itself.
pub async fn authorize(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::AuthorizeRequest>,
) -> axum::response::Response {
    let decision = match services
        .engine
        .decide(actor.actor(), &body.action, &body.resource, &ctx)
    {
        Ok(d) => d,
        Err(e) => return errors::engine_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "action": body.action,
            "resource": body.resource,
            "decision": decision,
        })),
    )
        .into_response()
}
