//! Storage abstractions for paper persistence.
//!
//! Papers are keyed by identifier; writing the same paper twice replaces the stored copy.
//! Each sync run is tracked in a sync log next to the papers.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── papers.json     # All persisted papers, newest revision first
//! └── sync_log.json   # Sync runs, oldest first
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Paper, SyncLog};

// Re-export for convenience
pub use local::LocalStorage;

/// Outcome of an upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertStats {
    /// Papers whose ID was not stored before
    pub new: usize,
    /// Papers that replaced a stored copy
    pub updated: usize,
}

/// On-disk shape of `papers.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperFile {
    /// ISO 8601 timestamp of the last write
    pub updated_at: DateTime<Utc>,
    pub count: usize,
    pub papers: Vec<Paper>,
}

impl PaperFile {
    pub fn new(papers: Vec<Paper>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: papers.len(),
            papers,
        }
    }
}

/// Trait for paper storage backends.
#[async_trait]
pub trait PaperStorage: Send + Sync {
    /// Insert or replace papers by ID.
    async fn upsert_papers(&self, papers: &[Paper]) -> Result<UpsertStats>;

    /// Fetch one paper; `NotFound` on a miss.
    async fn get(&self, id: &str) -> Result<Paper>;

    async fn exists(&self, id: &str) -> Result<bool>;

    /// Remove one paper; `NotFound` on a miss.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Papers ordered by `updated_at` descending, then ID.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Paper>>;

    /// Case-insensitive substring match on title or abstract, in list order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>>;

    async fn count(&self) -> Result<usize>;

    /// Most recent `updated_at` across stored papers.
    async fn latest_update(&self) -> Result<Option<DateTime<Utc>>>;

    /// Open a running sync log entry and return its ID.
    async fn start_sync(&self, query: &str) -> Result<u64>;

    async fn complete_sync(&self, id: u64, fetched: usize, stats: UpsertStats) -> Result<()>;

    async fn fail_sync(&self, id: u64, error: &str) -> Result<()>;

    async fn latest_sync(&self) -> Result<Option<SyncLog>>;

    /// Most recent sync runs, newest first.
    async fn sync_history(&self, limit: usize) -> Result<Vec<SyncLog>>;
}
