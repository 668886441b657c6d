//! Audit trail read endpoints.
//!
//! Guarded by a role-membership fast path rather than policy evaluation: only
//! members of the seeded administrator role may read the trail, regardless of
//! what wildcard policies say.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use warden_authz::Decision;
use warden_infra::{bootstrap, RequestContext};

use crate::app::{dto, errors, services::AppServices};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/audit-logs", get(list_audit_logs))
        .route("/audit-logs/stats", get(audit_log_stats))
}

fn require_administrator(
    services: &Arc<AppServices>,
    actor: &ActorContext,
    ctx: &RequestContext,
    action: &str,
) -> Result<(), axum::response::Response> {
    match services.engine.require_role(
        actor.actor(),
        bootstrap::ADMINISTRATOR_ROLE,
        action,
        "*",
        ctx,
    ) {
        Ok(Decision::Allow) => Ok(()),
        Ok(Decision::Deny) => Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "administrator role required",
        )),
        Err(e) => Err(errors::engine_error_to_response(e)),
    }
}

/// GET /admin/audit-logs - newest-first page of matching entries.
pub async fn list_audit_logs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<dto::AuditLogParams>,
) -> axum::response::Response {
    if let Err(resp) = require_administrator(&services, &actor, &ctx, "audit:Query") {
        return resp;
    }

    let (entries, page) = match services
        .engine
        .audit()
        .store()
        .query(&params.filter(), params.pagination())
    {
        Ok(result) => result,
        Err(e) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    };

    let snapshot = match services.directory.snapshot() {
        Ok(s) => s,
        Err(e) => return errors::directory_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "entries": entries
                .iter()
                .map(|e| dto::audit_entry_to_json(e, &snapshot))
                .collect::<Vec<_>>(),
            "page": page,
        })),
    )
        .into_response()
}

/// GET /admin/audit-logs/stats - aggregates over all matching entries.
pub async fn audit_log_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<dto::AuditLogParams>,
) -> axum::response::Response {
    if let Err(resp) = require_administrator(&services, &actor, &ctx, "audit:Stats") {
        return resp;
    }

    match services.engine.audit().store().stats(&params.filter()) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string()),
    }
}
