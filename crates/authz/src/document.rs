//! Policy documents and their write-time parsing.
//!
//! A policy document is parsed **once**, when the policy is created. Malformed
//! documents are rejected with a typed [`PolicyParseError`] and never stored,
//! so evaluation always runs over already-normalized statements.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::ValueObject;

/// The outcome a matching statement contributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl core::fmt::Display for Effect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Effect::Allow => f.write_str("Allow"),
            Effect::Deny => f.write_str("Deny"),
        }
    }
}

/// One normalized `{effect, actions, resources, condition}` rule.
///
/// `condition` is preserved verbatim for round-tripping but takes no part in
/// matching: the statement shape is the whole policy language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
}

impl ValueObject for Statement {}

impl Statement {
    pub fn new(
        effect: Effect,
        actions: impl IntoIterator<Item = impl Into<String>>,
        resources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            effect,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
            condition: None,
        }
    }
}

/// An ordered list of statements, validated at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub statements: Vec<Statement>,
}

/// Why a policy document was rejected at write time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyParseError {
    #[error("policy document must be a JSON object with a 'statements' array")]
    Malformed,

    #[error("policy document contains no statements")]
    Empty,

    #[error("statement {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("statement {index} has unrecognized effect '{value}' (expected 'Allow' or 'Deny')")]
    UnknownEffect { index: usize, value: String },

    #[error("statement {index} has no {field} patterns")]
    NoPatterns { index: usize, field: &'static str },

    #[error("statement {index} has an empty {field} pattern")]
    EmptyPattern { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    statements: Option<Vec<RawStatement>>,
}

#[derive(Debug, Deserialize)]
struct RawStatement {
    effect: Option<String>,
    actions: Option<Vec<String>>,
    resources: Option<Vec<String>>,
    condition: Option<serde_json::Value>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Parse and validate a raw JSON document into normalized statements.
    pub fn parse(value: &serde_json::Value) -> Result<Self, PolicyParseError> {
        let raw: RawDocument =
            serde_json::from_value(value.clone()).map_err(|_| PolicyParseError::Malformed)?;

        let raw_statements = raw.statements.ok_or(PolicyParseError::Malformed)?;
        if raw_statements.is_empty() {
            return Err(PolicyParseError::Empty);
        }

        let mut statements = Vec::with_capacity(raw_statements.len());
        for (index, raw) in raw_statements.into_iter().enumerate() {
            let effect_str = raw.effect.ok_or(PolicyParseError::MissingField {
                index,
                field: "effect",
            })?;
            let effect = match effect_str.as_str() {
                "Allow" => Effect::Allow,
                "Deny" => Effect::Deny,
                other => {
                    return Err(PolicyParseError::UnknownEffect {
                        index,
                        value: other.to_string(),
                    })
                }
            };

            let actions = raw.actions.ok_or(PolicyParseError::MissingField {
                index,
                field: "actions",
            })?;
            let resources = raw.resources.ok_or(PolicyParseError::MissingField {
                index,
                field: "resources",
            })?;

            validate_patterns(index, "action", &actions)?;
            validate_patterns(index, "resource", &resources)?;

            statements.push(Statement {
                effect,
                actions,
                resources,
                condition: raw.condition,
            });
        }

        Ok(Self { statements })
    }
}

fn validate_patterns(
    index: usize,
    field: &'static str,
    patterns: &[String],
) -> Result<(), PolicyParseError> {
    if patterns.is_empty() {
        return Err(PolicyParseError::NoPatterns { index, field });
    }
    if patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(PolicyParseError::EmptyPattern { index, field });
    }
    Ok(())
}
