//! Role resolution with soft expiry.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use warden_core::{RoleId, UserId};

use crate::directory::DirectorySnapshot;

/// Return the set of roles in effect for `user_id` at `as_of`.
///
/// Unknown or inactive users resolve to the empty set; "no roles" is never an
/// error. Expired assignments stay in storage but are excluded here. Internal
/// consistency comes from the snapshot: the whole resolution reads one view.
pub fn resolve_roles(
    snapshot: &DirectorySnapshot,
    user_id: UserId,
    as_of: DateTime<Utc>,
) -> HashSet<RoleId> {
    let active_user = snapshot.user(user_id).map(|u| u.is_active).unwrap_or(false);
    if !active_user {
        return HashSet::new();
    }

    snapshot
        .assignments_for(user_id)
        .filter(|edge| edge.is_active_at(as_of))
        .map(|edge| edge.role_id)
        .collect()
}
