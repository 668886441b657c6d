//! The decision engine: one entry point per authorization question.
//!
//! `decide` is synchronous. It takes one directory snapshot, resolves the
//! actor's roles, loads the attached statements, evaluates them, and records
//! exactly one audit entry whose status mirrors the decision. The evaluation
//! itself never fails; only storage access can.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use warden_audit::{AuditLogEntry, AuditStatus};
use warden_authz::{evaluate, Actor, Decision};
use warden_core::RequestId;

use crate::audit::{AuditError, AuditLogger};
use crate::directory::{AccessDirectory, DirectoryError};
use crate::policy_store::load_statements;
use crate::resolver::resolve_roles;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Request-scoped context carried into audit entries.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: RequestId::new(),
            client_ip: None,
            user_agent: None,
            session_id: None,
        }
    }
}

impl RequestContext {
    fn apply(&self, mut entry: AuditLogEntry) -> AuditLogEntry {
        entry = entry.with_request_id(self.request_id);
        if let Some(ip) = &self.client_ip {
            entry = entry.with_client_ip(ip.clone());
        }
        if let Some(agent) = &self.user_agent {
            entry = entry.with_user_agent(agent.clone());
        }
        if let Some(session) = &self.session_id {
            entry = entry.with_session_id(session.clone());
        }
        entry
    }
}

/// Answers "may this actor perform this action on this resource?".
pub struct AuthorizationEngine {
    directory: Arc<AccessDirectory>,
    audit: Arc<AuditLogger>,
}

impl AuthorizationEngine {
    pub fn new(directory: Arc<AccessDirectory>, audit: Arc<AuditLogger>) -> Self {
        Self { directory, audit }
    }

    pub fn directory(&self) -> &Arc<AccessDirectory> {
        &self.directory
    }

    pub fn audit(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    /// Evaluate `action` on `resource` for `actor` and record the outcome.
    ///
    /// Exactly one audit entry is written per call: SUCCESS for an allowed
    /// decision, FAILURE for a denied one. A storage failure is itself
    /// audited (best effort) before being returned.
    pub fn decide(
        &self,
        actor: &Actor,
        action: &str,
        resource: &str,
        ctx: &RequestContext,
    ) -> Result<Decision, EngineError> {
        let snapshot = match self.directory.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.record_error(actor, action, resource, ctx, &e);
                return Err(e.into());
            }
        };

        let roles = resolve_roles(&snapshot, actor.id, Utc::now());
        let statements = load_statements(&snapshot, &roles);
        let decision = evaluate(&statements, action, resource);

        let entry = self
            .outcome_entry(actor, action, resource, ctx, decision)
            .with_metadata(json!({
                "roles": roles.len(),
                "statements": statements.len(),
            }));
        self.audit.record(entry)?;

        Ok(decision)
    }

    /// Membership fast path: allowed iff the actor currently holds the role
    /// named `role_name`. Bypasses policy evaluation; audited like `decide`.
    pub fn require_role(
        &self,
        actor: &Actor,
        role_name: &str,
        action: &str,
        resource: &str,
        ctx: &RequestContext,
    ) -> Result<Decision, EngineError> {
        let snapshot = match self.directory.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.record_error(actor, action, resource, ctx, &e);
                return Err(e.into());
            }
        };

        let roles = resolve_roles(&snapshot, actor.id, Utc::now());
        let holds = snapshot
            .role_by_name(role_name)
            .map(|role| roles.contains(&role.id))
            .unwrap_or(false);
        let decision = if holds { Decision::Allow } else { Decision::Deny };

        let entry = self
            .outcome_entry(actor, action, resource, ctx, decision)
            .with_metadata(json!({ "required_role": role_name }));
        self.audit.record(entry)?;

        Ok(decision)
    }

    fn outcome_entry(
        &self,
        actor: &Actor,
        action: &str,
        resource: &str,
        ctx: &RequestContext,
        decision: Decision,
    ) -> AuditLogEntry {
        let (status, message) = match decision {
            Decision::Allow => (AuditStatus::Success, "access granted"),
            Decision::Deny => (AuditStatus::Failure, "access denied"),
        };
        ctx.apply(AuditLogEntry::new(action, resource, actor.id, status).with_message(message))
    }

    fn record_error(
        &self,
        actor: &Actor,
        action: &str,
        resource: &str,
        ctx: &RequestContext,
        error: &DirectoryError,
    ) {
        let entry = ctx
            .apply(AuditLogEntry::new(action, resource, actor.id, AuditStatus::Failure))
            .with_error("storage_error", error.to_string());
        if let Err(audit_err) = self.audit.record(entry) {
            warn!(error = %audit_err, "failed to audit a storage error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditStore, InMemoryAuditStore};
    use crate::bootstrap;
    use serde_json::json;
    use warden_audit::{AuditQuery, Pagination};
    use warden_core::UserId;

    fn actor(directory: &AccessDirectory, username: &str) -> Actor {
        let user = directory
            .register_user(UserId::new(), username, format!("{username}@example.com"))
            .unwrap();
        Actor {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }

    fn engine() -> (AuthorizationEngine, Arc<InMemoryAuditStore>) {
        let directory = Arc::new(AccessDirectory::new());
        let store = Arc::new(InMemoryAuditStore::new());
        let logger = Arc::new(AuditLogger::spawn(
            store.clone(),
            AuditLogger::DEFAULT_QUEUE_CAPACITY,
        ));
        (AuthorizationEngine::new(directory, logger), store)
    }

    fn grant(engine: &AuthorizationEngine, actor: &Actor, role: &str, doc: serde_json::Value) {
        let dir = engine.directory();
        let role = dir.create_role(role, false).unwrap();
        let policy = dir
            .create_policy(format!("{}Access", role.name), &doc, false)
            .unwrap();
        dir.attach_policy(role.id, policy.id).unwrap();
        dir.assign_role(actor.id, role.id, None, None).unwrap();
    }

    #[tokio::test]
    async fn actor_without_roles_is_denied() {
        let (engine, _store) = engine();
        let actor = actor(engine.directory(), "alice");

        let decision = engine
            .decide(&actor, "docs:Read", "docs/1", &RequestContext::default())
            .unwrap();
        assert_eq!(decision, Decision::Deny);
    }

    #[tokio::test]
    async fn deny_statement_beats_allow() {
        let (engine, _store) = engine();
        let actor = actor(engine.directory(), "bob");
        grant(
            &engine,
            &actor,
            "Editor",
            json!({ "statements": [
                { "effect": "Allow", "actions": ["docs:*"], "resources": ["*"] },
                { "effect": "Deny", "actions": ["docs:Delete"], "resources": ["*"] }
            ]}),
        );

        let ctx = RequestContext::default();
        assert_eq!(engine.decide(&actor, "docs:Read", "docs/1", &ctx).unwrap(), Decision::Allow);
        assert_eq!(engine.decide(&actor, "docs:Delete", "docs/1", &ctx).unwrap(), Decision::Deny);
    }

    #[tokio::test]
    async fn each_decide_writes_exactly_one_entry_matching_the_decision() {
        let (engine, store) = engine();
        let actor = actor(engine.directory(), "carol");
        grant(
            &engine,
            &actor,
            "Viewer",
            json!({ "statements": [
                { "effect": "Allow", "actions": ["docs:Read"], "resources": ["*"] }
            ]}),
        );

        let ctx = RequestContext::default();
        engine.decide(&actor, "docs:Read", "docs/1", &ctx).unwrap();
        engine.decide(&actor, "docs:Delete", "docs/1", &ctx).unwrap();

        // Wait for the queue to drain.
        for _ in 0..100 {
            if store.len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (entries, info) = store
            .query(&AuditQuery::default(), Pagination::default())
            .unwrap();
        assert_eq!(info.total, 2);

        let read = entries.iter().find(|e| e.action == "docs:Read").unwrap();
        assert_eq!(read.status, AuditStatus::Success);
        assert_eq!(read.message.as_deref(), Some("access granted"));
        assert_eq!(read.request_id, ctx.request_id);

        let delete = entries.iter().find(|e| e.action == "docs:Delete").unwrap();
        assert_eq!(delete.status, AuditStatus::Failure);
        assert_eq!(delete.message.as_deref(), Some("access denied"));
    }

    #[tokio::test]
    async fn require_role_checks_membership_not_policies() {
        let (engine, _store) = engine();
        let directory = engine.directory().clone();
        bootstrap::seed(&directory).unwrap();

        let admin = actor(&directory, "root");
        let admin_role = directory
            .snapshot()
            .unwrap()
            .role_by_name(bootstrap::ADMINISTRATOR_ROLE)
            .unwrap()
            .id;
        directory.assign_role(admin.id, admin_role, None, None).unwrap();

        let plain = actor(&directory, "mallory");

        let ctx = RequestContext::default();
        assert_eq!(
            engine
                .require_role(&admin, bootstrap::ADMINISTRATOR_ROLE, "audit:Query", "*", &ctx)
                .unwrap(),
            Decision::Allow
        );
        assert_eq!(
            engine
                .require_role(&plain, bootstrap::ADMINISTRATOR_ROLE, "audit:Query", "*", &ctx)
                .unwrap(),
            Decision::Deny
        );
    }

    #[tokio::test]
    async fn expired_role_no_longer_grants_access() {
        let (engine, _store) = engine();
        let actor = actor(engine.directory(), "erin");
        let dir = engine.directory();

        let role = dir.create_role("Temp", false).unwrap();
        let policy = dir
            .create_policy(
                "TempAccess",
                &json!({ "statements": [
                    { "effect": "Allow", "actions": ["docs:Read"], "resources": ["*"] }
                ]}),
                false,
            )
            .unwrap();
        dir.attach_policy(role.id, policy.id).unwrap();
        dir.assign_role(actor.id, role.id, None, Some(Utc::now() - chrono::Duration::minutes(1)))
            .unwrap();

        let decision = engine
            .decide(&actor, "docs:Read", "docs/1", &RequestContext::default())
            .unwrap();
        assert_eq!(decision, Decision::Deny);
    }
}
