//! Stored records for the authorization directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_authz::PolicyDocument;
use warden_core::{Entity, PolicyId, RoleId, UserId};

/// The directory's read view of an identity-subsystem user.
///
/// Authorization treats the user as opaque except for role membership and the
/// active flag; username/email are carried for audit rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A role. System roles cannot be deleted or renamed by non-system operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for RoleRecord {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A policy with its parse-once document. System policies are non-deletable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub id: PolicyId,
    pub name: String,
    pub document: PolicyDocument,
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for PolicyRecord {
    type Id = PolicyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Assignment edge, keyed by `(user_id, role_id)`.
///
/// Expiry is soft: an expired row stays in storage and is excluded at read
/// time. Revocation deletes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleRecord {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub assigned_by: Option<UserId>,
    pub assigned_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserRoleRecord {
    /// Whether this assignment still grants access at `as_of`.
    pub fn is_active_at(&self, as_of: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at > as_of,
        }
    }
}

/// Attachment edge, keyed by `(role_id, policy_id)`. No expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePolicyRecord {
    pub role_id: RoleId,
    pub policy_id: PolicyId,
    pub assigned_at: DateTime<Utc>,
}
