//! Append-only audit storage.

use std::sync::RwLock;

use thiserror::Error;

use warden_audit::{AuditLogEntry, AuditQuery, AuditStats, PageInfo, Pagination};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditStoreError {
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Durable sink and query surface for audit entries.
///
/// Entries are write-once; no update or delete operation exists on purpose.
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: AuditLogEntry) -> Result<(), AuditStoreError>;

    /// Newest-first page of matching entries plus pagination metadata.
    fn query(
        &self,
        filter: &AuditQuery,
        pagination: Pagination,
    ) -> Result<(Vec<AuditLogEntry>, PageInfo), AuditStoreError>;

    /// Aggregates over all matching entries.
    fn stats(&self, filter: &AuditQuery) -> Result<AuditStats, AuditStoreError>;
}

/// In-memory append-only audit store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored entries (test observability).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: AuditLogEntry) -> Result<(), AuditStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditStoreError::Storage("lock poisoned".to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn query(
        &self,
        filter: &AuditQuery,
        pagination: Pagination,
    ) -> Result<(Vec<AuditLogEntry>, PageInfo), AuditStoreError> {
        let pagination = pagination.normalized();
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditStoreError::Storage("lock poisoned".to_string()))?;

        let mut matching: Vec<AuditLogEntry> =
            entries.iter().filter(|e| filter.matches(e)).cloned().collect();

        // Newest first; entry ids are time-ordered (UUIDv7) so they break
        // ties between entries created in the same instant.
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let info = PageInfo::compute(matching.len(), pagination);
        let page: Vec<AuditLogEntry> = matching
            .into_iter()
            .skip(pagination.offset)
            .take(pagination.limit)
            .collect();

        Ok((page, info))
    }

    fn stats(&self, filter: &AuditQuery) -> Result<AuditStats, AuditStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditStoreError::Storage("lock poisoned".to_string()))?;

        let mut stats = AuditStats::default();
        for entry in entries.iter().filter(|e| filter.matches(e)) {
            stats.observe(entry);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_audit::AuditStatus;
    use warden_core::UserId;

    fn entry(action: &str, status: AuditStatus) -> AuditLogEntry {
        AuditLogEntry::new(action, "*", UserId::new(), status)
    }

    #[test]
    fn query_is_newest_first() {
        let store = InMemoryAuditStore::new();
        for i in 0..3 {
            store
                .append(entry(&format!("docs:Read{i}"), AuditStatus::Success))
                .unwrap();
        }

        let (page, info) = store
            .query(&AuditQuery::default(), Pagination::default())
            .unwrap();

        assert_eq!(info.total, 3);
        assert_eq!(page[0].action, "docs:Read2");
        assert_eq!(page[2].action, "docs:Read0");
    }

    #[test]
    fn pagination_slices_and_reports_totals() {
        let store = InMemoryAuditStore::new();
        for _ in 0..7 {
            store.append(entry("docs:Read", AuditStatus::Success)).unwrap();
        }

        let (page, info) = store
            .query(&AuditQuery::default(), Pagination::new(3, 3))
            .unwrap();

        assert_eq!(page.len(), 3);
        assert_eq!(info.total, 7);
        assert_eq!(info.total_pages, 3);

        let (last, _) = store
            .query(&AuditQuery::default(), Pagination::new(6, 3))
            .unwrap();
        assert_eq!(last.len(), 1);
    }

    #[test]
    fn filters_apply_before_pagination() {
        let store = InMemoryAuditStore::new();
        store.append(entry("docs:Read", AuditStatus::Success)).unwrap();
        store.append(entry("docs:Delete", AuditStatus::Failure)).unwrap();
        store.append(entry("users:List", AuditStatus::Success)).unwrap();

        let filter = AuditQuery {
            action_prefix: Some("docs:".to_string()),
            ..Default::default()
        };
        let (page, info) = store.query(&filter, Pagination::default()).unwrap();

        assert_eq!(info.total, 2);
        assert!(page.iter().all(|e| e.action.starts_with("docs:")));
    }

    #[test]
    fn stats_aggregate_matching_entries() {
        let store = InMemoryAuditStore::new();
        store.append(entry("roles:Create", AuditStatus::Success)).unwrap();
        store.append(entry("docs:Update", AuditStatus::Failure)).unwrap();
        store.append(entry("docs:Read", AuditStatus::Success)).unwrap();

        let stats = store.stats(&AuditQuery::default()).unwrap();
        assert_eq!(stats.total_actions, 3);
        assert_eq!(stats.by_severity.critical, 1);
        assert_eq!(stats.by_status.failure, 1);

        let failures_only = store
            .stats(&AuditQuery {
                status: Some(AuditStatus::Failure),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(failures_only.total_actions, 1);
    }
}
