//! Infrastructure layer: storage, the audit write path, and the decision engine.

pub mod audit;
pub mod bootstrap;
pub mod directory;
pub mod engine;
pub mod policy_store;
pub mod resolver;

pub use audit::{AuditError, AuditLogger, AuditStore, AuditStoreError, InMemoryAuditStore};
pub use directory::{
    AccessDirectory, DirectoryError, DirectorySnapshot, PolicyRecord, RolePolicyRecord,
    RoleRecord, UserRecord, UserRoleRecord,
};
pub use engine::{AuthorizationEngine, EngineError, RequestContext};
pub use policy_store::load_statements;
pub use resolver::resolve_roles;
