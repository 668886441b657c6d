//! `warden-audit`: audit trail domain types.
//!
//! Entries are write-once: nothing in this crate (or anywhere else) mutates an
//! entry after creation. Severity is derived from the action string by a pure
//! classification table so that stats aggregation stays reproducible.

pub mod entry;
pub mod query;
pub mod severity;

pub use entry::{AuditLogEntry, AuditStatus};
pub use query::{AuditQuery, AuditStats, PageInfo, Pagination, SeverityCounts, StatusCounts};
pub use severity::{classify_action, Severity};
