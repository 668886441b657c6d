//! Derived severity classification.
//!
//! Severity is never stored on an entry; it is a pure function of the action
//! string, keyed by namespace and verb. The table below is part of the
//! contract: stats aggregation is only meaningful if every component derives
//! severity the same way.

use serde::{Deserialize, Serialize};

/// Operator-facing classification of an audited action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Severity::Low => f.write_str("low"),
            Severity::Moderate => f.write_str("moderate"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// Authentication events are the front door; every one is trust-critical.
const AUTH_NAMESPACE: &str = "auth:";

/// Namespaces where mutations change who can do what. Mutating verbs here
/// classify critical; reads (`roles:List`, `policies:List`) do not.
const PRIVILEGED_NAMESPACES: &[&str] = &["roles:", "policies:"];

/// Individual actions that are critical outside their namespace default.
const CRITICAL_ACTIONS: &[&str] = &["users:Delete"];

/// Verbs that mutate state.
const MUTATING_VERBS: &[&str] = &[
    "Create", "Update", "Delete", "Assign", "Revoke", "Attach", "Detach", "Register",
];

/// Classify a namespaced action string.
pub fn classify_action(action: &str) -> Severity {
    if CRITICAL_ACTIONS.contains(&action) || action.starts_with(AUTH_NAMESPACE) {
        return Severity::Critical;
    }

    let verb = action.rsplit(':').next().unwrap_or(action);
    if MUTATING_VERBS.iter().any(|v| verb.starts_with(v)) {
        if PRIVILEGED_NAMESPACES.iter().any(|ns| action.starts_with(ns)) {
            Severity::Critical
        } else {
            Severity::Moderate
        }
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_and_policy_changes_are_critical() {
        assert_eq!(classify_action("roles:Create"), Severity::Critical);
        assert_eq!(classify_action("roles:Assign"), Severity::Critical);
        assert_eq!(classify_action("policies:Delete"), Severity::Critical);
        assert_eq!(classify_action("auth:Login"), Severity::Critical);
    }

    #[test]
    fn reads_in_privileged_namespaces_are_low() {
        assert_eq!(classify_action("roles:List"), Severity::Low);
        assert_eq!(classify_action("policies:List"), Severity::Low);
    }

    #[test]
    fn user_deletion_is_critical_but_other_user_actions_are_not() {
        assert_eq!(classify_action("users:Delete"), Severity::Critical);
        assert_eq!(classify_action("users:Register"), Severity::Moderate);
        assert_eq!(classify_action("users:List"), Severity::Low);
    }

    #[test]
    fn state_mutations_are_moderate() {
        assert_eq!(classify_action("docs:Create"), Severity::Moderate);
        assert_eq!(classify_action("docs:Update"), Severity::Moderate);
        assert_eq!(classify_action("docs:Delete"), Severity::Moderate);
    }

    #[test]
    fn reads_are_low() {
        assert_eq!(classify_action("docs:Read"), Severity::Low);
        assert_eq!(classify_action("docs:List"), Severity::Low);
        assert_eq!(classify_action("audit:Query"), Severity::Low);
    }

    #[test]
    fn unnamespaced_actions_fall_back_to_verb() {
        assert_eq!(classify_action("Delete"), Severity::Moderate);
        assert_eq!(classify_action("ping"), Severity::Low);
    }
}
