//! Append-only audit log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{AuditEntryId, Entity, RequestId, UserId};

/// Outcome recorded for an audited action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
    Pending,
}

impl core::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AuditStatus::Success => f.write_str("SUCCESS"),
            AuditStatus::Failure => f.write_str("FAILURE"),
            AuditStatus::Pending => f.write_str("PENDING"),
        }
    }
}

/// One immutable audit record.
///
/// `request_id` correlates the entries produced by a single logical operation;
/// the optional context fields carry whatever the boundary knew about the
/// request. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditEntryId,
    /// Namespaced action string, e.g. `docs:Create`.
    pub action: String,
    /// Namespaced resource identifier, or `*`.
    pub resource: String,
    pub actor_id: UserId,
    pub target_user_id: Option<UserId>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub request_id: RequestId,
    pub status: AuditStatus,
    pub message: Option<String>,
    /// Free-form JSON context.
    pub metadata: Option<serde_json::Value>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(
        action: impl Into<String>,
        resource: impl Into<String>,
        actor_id: UserId,
        status: AuditStatus,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            action: action.into(),
            resource: resource.into(),
            actor_id,
            target_user_id: None,
            client_ip: None,
            user_agent: None,
            session_id: None,
            request_id: RequestId::new(),
            status,
            message: None,
            metadata: None,
            error_code: None,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_target_user(mut self, target: UserId) -> Self {
        self.target_user_id = Some(target);
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn with_session_id(mut self, session: impl Into<String>) -> Self {
        self.session_id = Some(session.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self.error_message = Some(message.into());
        self
    }
}

impl Entity for AuditLogEntry {
    type Id = AuditEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
