//! Sync log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a sync run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Running,
    Completed,
    Failed,
}

/// One sync run as recorded by a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncLog {
    pub id: u64,
    pub query: String,
    #[serde(default)]
    pub papers_fetched: usize,
    #[serde(default)]
    pub papers_new: usize,
    #[serde(default)]
    pub papers_updated: usize,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncLog {
    /// Start a new running entry.
    pub fn start(id: u64, query: impl Into<String>) -> Self {
        Self {
            id,
            query: query.into(),
            papers_fetched: 0,
            papers_new: 0,
            papers_updated: 0,
            started_at: Utc::now(),
            completed_at: None,
            status: SyncStatus::Running,
            error: None,
        }
    }
}
