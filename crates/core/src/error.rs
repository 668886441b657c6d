//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Operational failures (storage, conflicts, denials) carry their own typed
/// errors in the layers that produce them; this covers the failures the pure
/// domain types themselves can raise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_displays_the_detail() {
        let err = DomainError::invalid_id("UserId: bad length");
        assert_eq!(err.to_string(), "invalid identifier: UserId: bad length");
    }
}
