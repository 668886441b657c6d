use std::sync::Arc;

use warden_infra::{bootstrap, AccessDirectory, AuditLogger, AuthorizationEngine, InMemoryAuditStore};

/// Shared service graph for the HTTP layer.
#[derive(Clone)]
pub struct AppServices {
    pub directory: Arc<AccessDirectory>,
    pub engine: Arc<AuthorizationEngine>,
}

/// Wire the in-memory service graph and seed the system role.
///
/// Must run inside a Tokio runtime (the audit drain task is spawned here).
pub fn build_services() -> AppServices {
    let directory = Arc::new(AccessDirectory::new());
    bootstrap::seed(&directory).expect("failed to seed system role");

    let store = Arc::new(InMemoryAuditStore::new());
    let audit = Arc::new(AuditLogger::spawn(store, AuditLogger::DEFAULT_QUEUE_CAPACITY));

    let engine = Arc::new(AuthorizationEngine::new(directory.clone(), audit));

    AppServices { directory, engine }
}
