//! Deterministic policy evaluation.
//!
//! Precedence is **Deny > Allow > default-Deny** and is the single source of
//! truth for every authorization decision in the system: no access unless
//! explicitly granted, and any explicit denial is absolute.

use serde::{Deserialize, Serialize};

use crate::document::{Effect, Statement};
use crate::pattern::pattern_matches;

/// The outcome of evaluating a statement set against an action/resource pair.
///
/// Serializes to `"allow"`/`"deny"`, the wire encoding of the authorize
/// endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(self) -> bool {
        self == Decision::Allow
    }
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny => f.write_str("deny"),
        }
    }
}

/// Evaluate resolved statements against a requested action and resource.
///
/// - No IO
/// - No panics
/// - Order-independent: a matching `Deny` overrides every `Allow` regardless
///   of statement order, role count, or policy count.
pub fn evaluate(statements: &[Statement], action: &str, resource: &str) -> Decision {
    let mut allowed = false;

    for statement in statements {
        if !statement_matches(statement, action, resource) {
            continue;
        }
        match statement.effect {
            // Explicit deny is absolute; nothing later can override it.
            Effect::Deny => return Decision::Deny,
            Effect::Allow => allowed = true,
        }
    }

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

fn statement_matches(statement: &Statement, action: &str, resource: &str) -> bool {
    statement.actions.iter().any(|p| pattern_matches(p, action))
        && statement.resources.iter().any(|p| pattern_matches(p, resource))
}
