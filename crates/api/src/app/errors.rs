use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use warden_infra::{DirectoryError, EngineError};

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    match err {
        DirectoryError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        DirectoryError::DuplicateRoleName(_) | DirectoryError::DuplicatePolicyName(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_name", err.to_string())
        }
        DirectoryError::AssignmentConflict | DirectoryError::AttachmentConflict => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        DirectoryError::SystemRoleProtected | DirectoryError::SystemPolicyProtected => {
            json_error(StatusCode::FORBIDDEN, "system_protected", err.to_string())
        }
        DirectoryError::PolicyParse(e) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_policy_document", e.to_string())
        }
        DirectoryError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}

pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    match err {
        EngineError::Directory(e) => directory_error_to_response(e),
        EngineError::Audit(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "audit_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
