//! Local filesystem storage implementation.
//!
//! Keeps every paper in one JSON document and the sync log in another. Writes go to a
//! temporary file first and are renamed into place, so a crash never leaves a torn
//! document behind. Read-modify-write cycles are serialized by an async mutex shared
//! between clones.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── papers.json     # PaperFile: papers sorted by updated_at desc, then id
//! └── sync_log.json   # Vec<SyncLog>, oldest first
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Paper, SyncLog, SyncStatus};
use crate::storage::{PaperFile, PaperStorage, UpsertStats};

const PAPERS_KEY: &str = "papers.json";
const SYNC_LOG_KEY: &str = "sync_log.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn load_papers(&self) -> Result<Vec<Paper>> {
        let file: Option<PaperFile> = self.read_json(PAPERS_KEY).await?;
        Ok(file.map(|f| f.papers).unwrap_or_default())
    }

    async fn save_papers(&self, mut papers: Vec<Paper>) -> Result<()> {
        papers.sort_by(list_order);
        self.write_json(PAPERS_KEY, &PaperFile::new(papers)).await
    }

    async fn load_sync_log(&self) -> Result<Vec<SyncLog>> {
        Ok(self.read_json(SYNC_LOG_KEY).await?.unwrap_or_default())
    }

    /// Apply `update` to one sync log entry and persist the log.
    async fn update_sync(&self, id: u64, update: impl FnOnce(&mut SyncLog)) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut logs = self.load_sync_log().await?;
        let entry = logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::validation(format!("unknown sync log id {}", id)))?;
        update(entry);
        self.write_json(SYNC_LOG_KEY, &logs).await
    }
}

/// Newest revision first; ties broken by ID so the order is total.
fn list_order(a: &Paper, b: &Paper) -> Ordering {
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| a.id.cmp(&b.id))
}

fn matches_query(paper: &Paper, needle_lower: &str) -> bool {
    paper.title.to_lowercase().contains(needle_lower)
        || paper.abstract_text.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl PaperStorage for LocalStorage {
    async fn upsert_papers(&self, papers: &[Paper]) -> Result<UpsertStats> {
        let _guard = self.lock.lock().await;
        let stored = self.load_papers().await?;

        let mut by_id: HashMap<String, Paper> =
            stored.into_iter().map(|p| (p.id.clone(), p)).collect();
        let mut stats = UpsertStats::default();

        for paper in papers {
            if by_id.insert(paper.id.clone(), paper.clone()).is_some() {
                stats.updated += 1;
            } else {
                stats.new += 1;
            }
        }

        self.save_papers(by_id.into_values().collect()).await?;
        log::info!(
            "Upserted {} papers ({} new, {} updated) into {}",
            papers.len(),
            stats.new,
            stats.updated,
            self.root_dir.display()
        );
        Ok(stats)
    }

    async fn get(&self, id: &str) -> Result<Paper> {
        self.load_papers()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(id))
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load_papers().await?.iter().any(|p| p.id == id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut papers = self.load_papers().await?;
        let before = papers.len();
        papers.retain(|p| p.id != id);
        if papers.len() == before {
            return Err(AppError::not_found(id));
        }
        self.save_papers(papers).await
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Paper>> {
        let mut papers = self.load_papers().await?;
        papers.sort_by(list_order);
        Ok(papers.into_iter().skip(offset).take(limit).collect())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>> {
        let needle = query.to_lowercase();
        let mut papers = self.load_papers().await?;
        papers.sort_by(list_order);
        Ok(papers
            .into_iter()
            .filter(|p| matches_query(p, &needle))
            .take(limit)
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.load_papers().await?.len())
    }

    async fn latest_update(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.load_papers().await?.iter().map(|p| p.updated_at).max())
    }

    async fn start_sync(&self, query: &str) -> Result<u64> {
        let _guard = self.lock.lock().await;
        let mut logs = self.load_sync_log().await?;
        let id = logs.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        logs.push(SyncLog::start(id, query));
        self.write_json(SYNC_LOG_KEY, &logs).await?;
        log::debug!("Started sync {} for query '{}'", id, query);
        Ok(id)
    }

    async fn complete_sync(&self, id: u64, fetched: usize, stats: UpsertStats) -> Result<()> {
        self.update_sync(id, |entry| {
            entry.papers_fetched = fetched;
            entry.papers_new = stats.new;
            entry.papers_updated = stats.updated;
            entry.completed_at = Some(Utc::now());
            entry.status = SyncStatus::Completed;
        })
        .await
    }

    async fn fail_sync(&self, id: u64, error: &str) -> Result<()> {
        self.update_sync(id, |entry| {
            entry.completed_at = Some(Utc::now());
            entry.status = SyncStatus::Failed;
            entry.error = Some(error.to_string());
        })
        .await
    }

    async fn latest_sync(&self) -> Result<Option<SyncLog>> {
        Ok(self.load_sync_log().await?.into_iter().max_by_key(|l| l.id))
    }

    async fn sync_history(&self, limit: usize) -> Result<Vec<SyncLog>> {
        let mut logs = self.load_sync_log().await?;
        logs.sort_by(|a, b| b.id.cmp(&a.id));
        logs.truncate(limit);
        Ok(logs)
    }
}
