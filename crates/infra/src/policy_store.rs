//! Loading the statement set for a set of roles.

use std::collections::HashSet;

use warden_authz::Statement;
use warden_core::{PolicyId, RoleId};

use crate::directory::DirectorySnapshot;

/// Flatten the policies attached to `roles` into one ordered statement list.
///
/// Each policy contributes its statements exactly once (deduplicated by policy
/// id) in the policy's internal order. Cross-policy order is made
/// deterministic (sorted role ids, then attachment time, then policy id),
/// though deny-wins evaluation makes it semantically irrelevant.
pub fn load_statements(snapshot: &DirectorySnapshot, roles: &HashSet<RoleId>) -> Vec<Statement> {
    let mut role_ids: Vec<RoleId> = roles.iter().copied().collect();
    role_ids.sort();

    let mut seen: HashSet<PolicyId> = HashSet::new();
    let mut statements = Vec::new();

    for role_id in role_ids {
        let mut attachments: Vec<_> = snapshot.attachments_for(role_id).collect();
        attachments.sort_by(|a, b| {
            a.assigned_at
                .cmp(&b.assigned_at)
                .then(a.policy_id.cmp(&b.policy_id))
        });

        for edge in attachments {
            if !seen.insert(edge.policy_id) {
                continue;
            }
            if let Some(policy) = snapshot.policy(edge.policy_id) {
                statements.extend(policy.document.statements.iter().cloned());
            }
        }
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::AccessDirectory;
    use serde_json::json;
    use warden_core::UserId;

    #[test]
    fn policy_reachable_via_two_roles_contributes_once() {
        let dir = AccessDirectory::new();
        let editor = dir.create_role("Editor", false).unwrap();
        let viewer = dir.create_role("Viewer", false).unwrap();
        let shared = dir
            .create_policy(
                "Shared",
                &json!({ "statements": [
                    { "effect": "Allow", "actions": ["docs:Read"], "resources": ["*"] }
                ]}),
                false,
            )
            .unwrap();

        dir.attach_policy(editor.id, shared.id).unwrap();
        dir.attach_policy(viewer.id, shared.id).unwrap();

        let snapshot = dir.snapshot().unwrap();
        let roles: HashSet<_> = [editor.id, viewer.id].into_iter().collect();
        let statements = load_statements(&snapshot, &roles);

        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn statements_preserve_policy_internal_order() {
        let dir = AccessDirectory::new();
        let role = dir.create_role("Viewer", false).unwrap();
        let policy = dir
            .create_policy(
                "ViewerAccess",
                &json!({ "statements": [
                    { "effect": "Allow", "actions": ["docs:Read"], "resources": ["*"] },
                    { "effect": "Deny", "actions": ["docs:Delete"], "resources": ["*"] }
                ]}),
                false,
            )
            .unwrap();
        dir.attach_policy(role.id, policy.id).unwrap();

        let snapshot = dir.snapshot().unwrap();
        let roles: HashSet<_> = [role.id].into_iter().collect();
        let statements = load_statements(&snapshot, &roles);

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].actions, vec!["docs:Read"]);
        assert_eq!(statements[1].actions, vec!["docs:Delete"]);
    }

    #[test]
    fn roles_without_policies_contribute_nothing() {
        let dir = AccessDirectory::new();
        let role = dir.create_role("Empty", false).unwrap();
        let snapshot = dir.snapshot().unwrap();
        let roles: HashSet<_> = [role.id].into_iter().collect();
        assert!(load_statements(&snapshot, &roles).is_empty());
    }

    #[test]
    fn detached_policy_no_longer_loads() {
        let dir = AccessDirectory::new();
        let _user = dir.register_user(UserId::new(), "alice", "alice@example.com").unwrap();
        let role = dir.create_role("Editor", false).unwrap();
        let policy = dir
            .create_policy(
                "EditorAccess",
                &json!({ "statements": [
                    { "effect": "Allow", "actions": ["docs:*"], "resources": ["*"] }
                ]}),
                false,
            )
            .unwrap();
        dir.attach_policy(role.id, policy.id).unwrap();
        dir.detach_policy(role.id, policy.id).unwrap();

        let snapshot = dir.snapshot().unwrap();
        let roles: HashSet<_> = [role.id].into_iter().collect();
        assert!(load_statements(&snapshot, &roles).is_empty());
    }
}
