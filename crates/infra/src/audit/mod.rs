//! Audit write and read paths.

mod logger;
mod store;

pub use logger::{AuditError, AuditLogger};
pub use store::{AuditStore, AuditStoreError, InMemoryAuditStore};
