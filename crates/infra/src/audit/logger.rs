//! The audit write path: bounded queue with synchronous fallback.
//!
//! Critical actions are written synchronously: the triggering operation is
//! not finished until the entry is durable (or the caller sees the failure).
//! Lower severities go through a bounded channel drained by a background
//! task; when the queue is saturated the writer degrades to a synchronous
//! write instead of dropping the entry, so backpressure always resolves in
//! bounded time.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error};

use warden_audit::{classify_action, AuditLogEntry, Severity};

use super::store::{AuditStore, AuditStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    Write(#[from] AuditStoreError),
}

/// Accepts audit entries and guarantees they are eventually recorded,
/// at-least-once, preserving per-caller arrival order.
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
    tx: mpsc::Sender<AuditLogEntry>,
}

impl AuditLogger {
    /// Default queue capacity for the asynchronous write path.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

    /// Create a logger and spawn its drain task on the current runtime.
    pub fn spawn(store: Arc<dyn AuditStore>, capacity: usize) -> Self {
        let (logger, rx) = Self::detached(store.clone(), capacity);
        tokio::spawn(drain(rx, store));
        logger
    }

    /// Create a logger without spawning the drain task (tests drive the
    /// receiver themselves).
    fn detached(
        store: Arc<dyn AuditStore>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<AuditLogEntry>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { store, tx }, rx)
    }

    /// Record one entry.
    ///
    /// Critical entries are written synchronously and their failure is
    /// returned to the caller. Non-critical entries are enqueued; on a full
    /// or closed queue they fall back to a synchronous write whose failure is
    /// logged, not propagated (best-effort for non-critical actions).
    pub fn record(&self, entry: AuditLogEntry) -> Result<(), AuditError> {
        if classify_action(&entry.action) == Severity::Critical {
            return self.store.append(entry).map_err(AuditError::from);
        }

        let entry = match self.tx.try_send(entry) {
            Ok(()) => return Ok(()),
            Err(mpsc::error::TrySendError::Full(entry)) => {
                debug!(action = %entry.action, "audit queue saturated; writing synchronously");
                entry
            }
            Err(mpsc::error::TrySendError::Closed(entry)) => entry,
        };

        if let Err(e) = self.store.append(entry) {
            error!(error = %e, "synchronous audit fallback write failed");
        }
        Ok(())
    }

    /// Read access to the underlying store for query/stats endpoints.
    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }
}

async fn drain(mut rx: mpsc::Receiver<AuditLogEntry>, store: Arc<dyn AuditStore>) {
    while let Some(entry) = rx.recv().await {
        if let Err(e) = store.append(entry) {
            error!(error = %e, "audit drain write failed");
        }
    }
    debug!("audit drain task stopped");
}
