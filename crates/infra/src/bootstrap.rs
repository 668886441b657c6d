//! First-run seeding.

use serde_json::json;
use tracing::info;

use crate::directory::{AccessDirectory, DirectoryError, RoleRecord};

/// Name of the seeded system role that guards administrative surfaces.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Name of the seeded wildcard policy attached to the administrator role.
pub const ADMINISTRATOR_POLICY: &str = "AdministratorAccess";

/// Seed the administrator role and its allow-everything policy.
///
/// Idempotent against an empty directory only; callers run this once at
/// startup before the directory accepts traffic.
pub fn seed(directory: &AccessDirectory) -> Result<RoleRecord, DirectoryError> {
    let role = directory.create_role(ADMINISTRATOR_ROLE, true)?;
    let policy = directory.create_policy(
        ADMINISTRATOR_POLICY,
        &json!({ "statements": [
            { "effect": "Allow", "actions": ["*"], "resources": ["*"] }
        ]}),
        true,
    )?;
    directory.attach_policy(role.id, policy.id)?;

    info!(role = ADMINISTRATOR_ROLE, policy = ADMINISTRATOR_POLICY, "seeded system role");
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy_store::load_statements;
    use crate::resolver::resolve_roles;
    use chrono::Utc;
    use warden_authz::{evaluate, Decision};
    use warden_core::UserId;

    #[test]
    fn seeded_administrator_can_do_anything() {
        let dir = AccessDirectory::new();
        let role = seed(&dir).unwrap();

        let user = dir.register_user(UserId::new(), "root", "root@example.com").unwrap();
        dir.assign_role(user.id, role.id, None, None).unwrap();

        let snapshot = dir.snapshot().unwrap();
        let roles = resolve_roles(&snapshot, user.id, Utc::now());
        let statements = load_statements(&snapshot, &roles);

        assert_eq!(evaluate(&statements, "audit:Query", "*"), Decision::Allow);
        assert_eq!(evaluate(&statements, "roles:Delete", "roles/x"), Decision::Allow);
    }

    #[test]
    fn seeded_role_and_policy_are_protected() {
        let dir = AccessDirectory::new();
        let role = seed(&dir).unwrap();
        assert!(dir.delete_role(role.id).is_err());
    }
}
