use std::sync::Arc;

use axum::http::StatusCode;

use warden_infra::RequestContext;

use crate::app::{errors, services::AppServices};
use crate::context::ActorContext;

/// Policy-evaluated guard shared by the resource handlers.
///
/// Every call records one audit entry (allow or deny) via the engine.
pub fn guard(
    services: &Arc<AppServices>,
    actor: &ActorContext,
    ctx: &RequestContext,
    action: &str,
    resource: &str,
) -> Result<(), axum::response::Response> {
    match services.engine.decide(actor.actor(), action, resource, ctx) {
        Ok(decision) if decision.is_allow() => Ok(()),
        Ok(_) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "access denied",
        )),
        Err(e) => Err(errors::engine_error_to_response(e)),
    }
}
