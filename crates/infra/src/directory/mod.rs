//! In-memory authorization directory.
//!
//! One `RwLock` guards all five tables, so every mutation is atomic and a
//! snapshot is one consistent read view: a role removed mid-evaluation can
//! never contribute some-but-not-all of its policies to a single `decide`
//! call. The relational schema this mirrors is an interface, not an
//! implementation detail; the edge tables are plain maps keyed by their
//! composite pairs.

mod records;

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use thiserror::Error;

use warden_authz::{PolicyDocument, PolicyParseError};
use warden_core::{PolicyId, RoleId, UserId};

pub use records::{PolicyRecord, RolePolicyRecord, RoleRecord, UserRecord, UserRoleRecord};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectoryError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("role name '{0}' already exists")]
    DuplicateRoleName(String),

    #[error("policy name '{0}' already exists")]
    DuplicatePolicyName(String),

    #[error("role is already assigned to this user")]
    AssignmentConflict,

    #[error("policy is already attached to this role")]
    AttachmentConflict,

    #[error("system roles cannot be deleted or renamed")]
    SystemRoleProtected,

    #[error("system policies cannot be deleted")]
    SystemPolicyProtected,

    #[error(transparent)]
    PolicyParse(#[from] PolicyParseError),

    #[error("storage failure: {0}")]
    Storage(String),
}

#[derive(Debug, Default, Clone)]
struct DirectoryState {
    users: HashMap<UserId, UserRecord>,
    roles: HashMap<RoleId, RoleRecord>,
    policies: HashMap<PolicyId, PolicyRecord>,
    user_roles: HashMap<(UserId, RoleId), UserRoleRecord>,
    role_policies: HashMap<(RoleId, PolicyId), RolePolicyRecord>,
}

/// One consistent read view of the directory.
///
/// Cloned out under a single read guard; a `decide` call resolves roles and
/// loads policies from the same snapshot. A snapshot taken before a concurrent
/// write may legitimately reflect either the old or new state.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    state: DirectoryState,
}

impl DirectorySnapshot {
    pub fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.state.users.get(&id)
    }

    pub fn role(&self, id: RoleId) -> Option<&RoleRecord> {
        self.state.roles.get(&id)
    }

    pub fn role_by_name(&self, name: &str) -> Option<&RoleRecord> {
        self.state.roles.values().find(|r| r.name == name)
    }

    pub fn policy(&self, id: PolicyId) -> Option<&PolicyRecord> {
        self.state.policies.get(&id)
    }

    pub fn assignments_for(&self, user_id: UserId) -> impl Iterator<Item = &UserRoleRecord> {
        self.state
            .user_roles
            .values()
            .filter(move |edge| edge.user_id == user_id)
    }

    pub fn attachments_for(&self, role_id: RoleId) -> impl Iterator<Item = &RolePolicyRecord> {
        self.state
            .role_policies
            .values()
            .filter(move |edge| edge.role_id == role_id)
    }
}

/// In-memory store of users, roles, policies, and the two edge tables.
///
/// Safe for concurrent use; reads never block other reads, and each mutation
/// is atomic under one write guard.
#[derive(Debug, Default)]
pub struct AccessDirectory {
    state: RwLock<DirectoryState>,
}

impl AccessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, DirectoryState>, DirectoryError> {
        self.state
            .read()
            .map_err(|_| DirectoryError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, DirectoryState>, DirectoryError> {
        self.state
            .write()
            .map_err(|_| DirectoryError::Storage("lock poisoned".to_string()))
    }

    /// Clone one consistent read view of all tables.
    pub fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError> {
        Ok(DirectorySnapshot {
            state: self.read()?.clone(),
        })
    }

    // ─── users (ingestion from the identity subsystem) ───────────────────────

    /// Upsert the directory's view of a user. The identity subsystem is the
    /// source of truth; re-registration overwrites username/email/active.
    pub fn register_user(
        &self,
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<UserRecord, DirectoryError> {
        let record = UserRecord {
            id,
            username: username.into(),
            email: email.into(),
            is_active: true,
        };
        self.write()?.users.insert(id, record.clone());
        Ok(record)
    }

    pub fn set_user_active(&self, id: UserId, is_active: bool) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(DirectoryError::NotFound("user"))?;
        user.is_active = is_active;
        Ok(())
    }

    pub fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    // ─── roles ───────────────────────────────────────────────────────────────

    pub fn create_role(
        &self,
        name: impl Into<String>,
        is_system: bool,
    ) -> Result<RoleRecord, DirectoryError> {
        let name = name.into();
        let mut state = self.write()?;

        if state.roles.values().any(|r| r.name == name) {
            return Err(DirectoryError::DuplicateRoleName(name));
        }

        let record = RoleRecord {
            id: RoleId::new(),
            name,
            is_system,
            created_at: Utc::now(),
        };
        state.roles.insert(record.id, record.clone());
        Ok(record)
    }

    /// Delete a role and cascade-remove its assignment and attachment edges.
    pub fn delete_role(&self, id: RoleId) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        let role = state.roles.get(&id).ok_or(DirectoryError::NotFound("role"))?;
        if role.is_system {
            return Err(DirectoryError::SystemRoleProtected);
        }

        state.roles.remove(&id);
        state.user_roles.retain(|(_, role_id), _| *role_id != id);
        state.role_policies.retain(|(role_id, _), _| *role_id != id);
        Ok(())
    }

    pub fn list_roles(&self) -> Result<Vec<RoleRecord>, DirectoryError> {
        let mut roles: Vec<_> = self.read()?.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(roles)
    }

    // ─── policies ────────────────────────────────────────────────────────────

    /// Parse and store a policy. Malformed documents are rejected here, at
    /// write time, and never stored.
    pub fn create_policy(
        &self,
        name: impl Into<String>,
        document: &serde_json::Value,
        is_system: bool,
    ) -> Result<PolicyRecord, DirectoryError> {
        let name = name.into();
        let document = PolicyDocument::parse(document)?;

        let mut state = self.write()?;
        if state.policies.values().any(|p| p.name == name) {
            return Err(DirectoryError::DuplicatePolicyName(name));
        }

        let record = PolicyRecord {
            id: PolicyId::new(),
            name,
            document,
            is_system,
            created_at: Utc::now(),
        };
        state.policies.insert(record.id, record.clone());
        Ok(record)
    }

    /// Delete a policy and cascade-remove its attachment edges.
    pub fn delete_policy(&self, id: PolicyId) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        let policy = state
            .policies
            .get(&id)
            .ok_or(DirectoryError::NotFound("policy"))?;
        if policy.is_system {
            return Err(DirectoryError::SystemPolicyProtected);
        }

        state.policies.remove(&id);
        state.role_policies.retain(|(_, policy_id), _| *policy_id != id);
        Ok(())
    }

    pub fn list_policies(&self) -> Result<Vec<PolicyRecord>, DirectoryError> {
        let mut policies: Vec<_> = self.read()?.policies.values().cloned().collect();
        policies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(policies)
    }

    // ─── assignment edges ────────────────────────────────────────────────────

    /// Assign a role to a user.
    ///
    /// At most one row exists per `(user, role)` pair: an **active** existing
    /// row is a conflict; an **expired** row is superseded by the new
    /// assignment.
    pub fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<UserRoleRecord, DirectoryError> {
        let now = Utc::now();
        let mut state = self.write()?;

        if !state.users.contains_key(&user_id) {
            return Err(DirectoryError::NotFound("user"));
        }
        if !state.roles.contains_key(&role_id) {
            return Err(DirectoryError::NotFound("role"));
        }

        if let Some(existing) = state.user_roles.get(&(user_id, role_id)) {
            if existing.is_active_at(now) {
                return Err(DirectoryError::AssignmentConflict);
            }
        }

        let record = UserRoleRecord {
            user_id,
            role_id,
            assigned_by,
            assigned_at: now,
            expires_at,
        };
        state.user_roles.insert((user_id, role_id), record.clone());
        Ok(record)
    }

    /// Revoke an assignment: explicit deletion of the edge, terminal. Works on
    /// both active and expired rows.
    pub fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> Result<(), DirectoryError> {
        self.write()?
            .user_roles
            .remove(&(user_id, role_id))
            .map(|_| ())
            .ok_or(DirectoryError::NotFound("role assignment"))
    }

    // ─── attachment edges ────────────────────────────────────────────────────

    pub fn attach_policy(
        &self,
        role_id: RoleId,
        policy_id: PolicyId,
    ) -> Result<RolePolicyRecord, DirectoryError> {
        let mut state = self.write()?;

        if !state.roles.contains_key(&role_id) {
            return Err(DirectoryError::NotFound("role"));
        }
        if !state.policies.contains_key(&policy_id) {
            return Err(DirectoryError::NotFound("policy"));
        }
        if state.role_policies.contains_key(&(role_id, policy_id)) {
            return Err(DirectoryError::AttachmentConflict);
        }

        let record = RolePolicyRecord {
            role_id,
            policy_id,
            assigned_at: Utc::now(),
        };
        state
            .role_policies
            .insert((role_id, policy_id), record.clone());
        Ok(record)
    }

    pub fn detach_policy(&self, role_id: RoleId, policy_id: PolicyId) -> Result<(), DirectoryError> {
        self.write()?
            .role_policies
            .remove(&(role_id, policy_id))
            .map(|_| ())
            .ok_or(DirectoryError::NotFound("policy attachment"))
    }
}
