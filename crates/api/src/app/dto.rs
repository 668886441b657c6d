use chrono::{DateTime, Utc};
use serde::Deserialize;

use warden_audit::{AuditLogEntry, AuditQuery, AuditStatus, Pagination};
use warden_core::{PolicyId, RoleId, UserId};
use warden_infra::{DirectorySnapshot, PolicyRecord, RoleRecord, UserRoleRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Id assigned by the identity subsystem (the source of truth).
    /// Generated when absent.
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePolicyRequest {
    pub name: String,
    pub document: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role_id: RoleId,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct AttachPolicyRequest {
    pub policy_id: PolicyId,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub action: String,
    pub resource: String,
}

/// Query parameters accepted by the audit read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogParams {
    pub actor_id: Option<UserId>,
    /// Prefix match on the action string.
    pub action: Option<String>,
    /// Prefix match on the resource string.
    pub resource: Option<String>,
    pub status: Option<AuditStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl AuditLogParams {
    pub fn filter(&self) -> AuditQuery {
        AuditQuery {
            actor_id: self.actor_id,
            action_prefix: self.action.clone(),
            resource_prefix: self.resource.clone(),
            status: self.status,
            created_after: self.from,
            created_before: self.to,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.offset.unwrap_or(0),
            self.limit.unwrap_or(Pagination::DEFAULT_LIMIT),
        )
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn role_to_json(r: &RoleRecord) -> serde_json::Value {
    serde_json::json!({
        "id": r.id.to_string(),
        "name": r.name,
        "is_system": r.is_system,
        "created_at": r.created_at.to_rfc3339(),
    })
}

pub fn policy_to_json(p: &PolicyRecord) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.to_string(),
        "name": p.name,
        "is_system": p.is_system,
        "document": p.document,
        "created_at": p.created_at.to_rfc3339(),
    })
}

pub fn assignment_to_json(a: &UserRoleRecord) -> serde_json::Value {
    serde_json::json!({
        "user_id": a.user_id.to_string(),
        "role_id": a.role_id.to_string(),
        "assigned_by": a.assigned_by.map(|id| id.to_string()),
        "assigned_at": a.assigned_at.to_rfc3339(),
        "expires_at": a.expires_at.map(|t| t.to_rfc3339()),
    })
}

/// Render an audit entry with the actor's display identity joined in from
/// the directory. Actors the directory no longer knows render as "unknown".
pub fn audit_entry_to_json(entry: &AuditLogEntry, snapshot: &DirectorySnapshot) -> serde_json::Value {
    let (username, email) = snapshot
        .user(entry.actor_id)
        .map(|u| (u.username.clone(), u.email.clone()))
        .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string()));

    serde_json::json!({
        "id": entry.id.to_string(),
        "action": entry.action,
        "resource": entry.resource,
        "actor": {
            "id": entry.actor_id.to_string(),
            "username": username,
            "email": email,
        },
        "target_user_id": entry.target_user_id.map(|id| id.to_string()),
        "client_ip": entry.client_ip,
        "user_agent": entry.user_agent,
        "session_id": entry.session_id,
        "request_id": entry.request_id.to_string(),
        "status": entry.status,
        "message": entry.message,
        "metadata": entry.metadata,
        "error_code": entry.error_code,
        "error_message": entry.error_message,
        "created_at": entry.created_at.to_rfc3339(),
    })
}
