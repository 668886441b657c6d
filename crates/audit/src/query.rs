//! Query filters, pagination, and stats aggregates for audit reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::entry::{AuditLogEntry, AuditStatus};
use crate::severity::{classify_action, Severity};

/// Filter set for audit queries. All filters are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditQuery {
    pub actor_id: Option<UserId>,
    /// Prefix match on the action string.
    pub action_prefix: Option<String>,
    /// Prefix match on the resource string.
    pub resource_prefix: Option<String>,
    pub status: Option<AuditStatus>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(actor_id) = self.actor_id {
            if entry.actor_id != actor_id {
                return false;
            }
        }
        if let Some(prefix) = &self.action_prefix {
            if !entry.action.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(prefix) = &self.resource_prefix {
            if !entry.resource.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if entry.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if entry.created_at > before {
                return false;
            }
        }
        true
    }
}

/// Offset/limit pagination request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    pub const DEFAULT_LIMIT: usize = 50;
    pub const MAX_LIMIT: usize = 500;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }.normalized()
    }

    /// Clamp the limit into `1..=MAX_LIMIT`.
    pub fn normalized(mut self) -> Self {
        if self.limit == 0 {
            self.limit = Self::DEFAULT_LIMIT;
        }
        self.limit = self.limit.min(Self::MAX_LIMIT);
        self
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of entries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn compute(total: usize, pagination: Pagination) -> Self {
        let pagination = pagination.normalized();
        Self {
            total,
            offset: pagination.offset,
            limit: pagination.limit,
            total_pages: total.div_ceil(pagination.limit),
        }
    }
}

/// Per-severity counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: u64,
    pub moderate: u64,
    pub critical: u64,
}

impl SeverityCounts {
    pub fn observe(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Critical => self.critical += 1,
        }
    }
}

/// Per-status counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub success: u64,
    pub failure: u64,
    pub pending: u64,
}

impl StatusCounts {
    pub fn observe(&mut self, status: AuditStatus) {
        match status {
            AuditStatus::Success => self.success += 1,
            AuditStatus::Failure => self.failure += 1,
            AuditStatus::Pending => self.pending += 1,
        }
    }
}

/// Aggregates over the entries matching a filter set.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total_actions: u64,
    pub by_severity: SeverityCounts,
    pub by_status: StatusCounts,
}

impl AuditStats {
    pub fn observe(&mut self, entry: &AuditLogEntry) {
        self.total_actions += 1;
        self.by_severity.observe(classify_action(&entry.action));
        self.by_status.observe(entry.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(action: &str, status: AuditStatus) -> AuditLogEntry {
        AuditLogEntry::new(action, "*", UserId::new(), status)
    }

    #[test]
    fn filters_are_conjunctive() {
        let e = entry("docs:Create", AuditStatus::Success);

        let q = AuditQuery {
            action_prefix: Some("docs:".to_string()),
            status: Some(AuditStatus::Success),
            ..Default::default()
        };
        assert!(q.matches(&e));

        let q = AuditQuery {
            action_prefix: Some("docs:".to_string()),
            status: Some(AuditStatus::Failure),
            ..Default::default()
        };
        assert!(!q.matches(&e));
    }

    #[test]
    fn actor_filter_is_exact() {
        let e = entry("docs:Read", AuditStatus::Success);
        let q = AuditQuery {
            actor_id: Some(e.actor_id),
            ..Default::default()
        };
        assert!(q.matches(&e));

        let q = AuditQuery {
            actor_id: Some(UserId::new()),
            ..Default::default()
        };
        assert!(!q.matches(&e));
    }

    #[test]
    fn created_range_is_inclusive_of_bounds() {
        let e = entry("docs:Read", AuditStatus::Success);
        let q = AuditQuery {
            created_after: Some(e.created_at),
            created_before: Some(e.created_at),
            ..Default::default()
        };
        assert!(q.matches(&e));
    }

    #[test]
    fn page_info_rounds_up() {
        let info = PageInfo::compute(101, Pagination::new(0, 50));
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total, 101);

        let empty = PageInfo::compute(0, Pagination::default());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        let p = Pagination::new(10, 0);
        assert_eq!(p.limit, Pagination::DEFAULT_LIMIT);
        assert_eq!(p.offset, 10);
    }

    #[test]
    fn stats_observe_counts_by_severity_and_status() {
        let mut stats = AuditStats::default();
        stats.observe(&entry("roles:Create", AuditStatus::Success));
        stats.observe(&entry("docs:Update", AuditStatus::Failure));
        stats.observe(&entry("docs:Read", AuditStatus::Success));

        assert_eq!(stats.total_actions, 3);
        assert_eq!(stats.by_severity.critical, 1);
        assert_eq!(stats.by_severity.moderate, 1);
        assert_eq!(stats.by_severity.low, 1);
        assert_eq!(stats.by_status.success, 2);
        assert_eq!(stats.by_status.failure, 1);
    }
}
