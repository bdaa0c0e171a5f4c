// src/pipeline/query.rs

//! Read-side operations over a paper store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Paper, SyncLog};
use crate::storage::PaperStorage;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size actually served: 0 or anything above the maximum falls back to the default.
pub fn clamp_limit(limit: usize) -> usize {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        DEFAULT_PAGE_SIZE
    } else {
        limit
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PaperPage {
    pub papers: Vec<Paper>,
    pub limit: usize,
    pub offset: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub papers: Vec<Paper>,
    pub count: usize,
}

/// Store-wide statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_papers: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub last_sync: Option<SyncLog>,
    pub data_source: &'static str,
}

pub async fn list_papers(store: &dyn PaperStorage, limit: usize, offset: usize) -> Result<PaperPage> {
    let limit = clamp_limit(limit);
    let papers = store.list(limit, offset).await?;
    Ok(PaperPage {
        count: papers.len(),
        papers,
        limit,
        offset,
    })
}

pub async fn get_paper(store: &dyn PaperStorage, id: &str) -> Result<Paper> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::validation("paper ID required"));
    }
    store.get(id).await
}

pub async fn search_papers(
    store: &dyn PaperStorage,
    query: &str,
    limit: usize,
) -> Result<SearchResults> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::validation("search query required"));
    }
    let papers = store.search(query, clamp_limit(limit)).await?;
    Ok(SearchResults {
        query: query.to_string(),
        count: papers.len(),
        papers,
    })
}

pub async fn store_stats(store: &dyn PaperStorage) -> Result<StoreStats> {
    Ok(StoreStats {
        total_papers: store.count().await?,
        last_update: store.latest_update().await?,
        last_sync: store.latest_sync().await?,
        data_source: "arXiv API",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    fn paper(id: &str, title: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: title.to_string(),
            authors: vec!["John Doe".to_string()],
            updated_at: Utc::now(),
            ..Paper::default()
        }
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(100), 100);
        assert_eq!(clamp_limit(101), DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_list_and_stats() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        store
            .upsert_papers(&[paper("a", "Alpha"), paper("b", "Beta")])
            .await
            .unwrap();

        let page = list_papers(&store, 0, 0).await.unwrap();
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.count, 2);

        let stats = store_stats(&store).await.unwrap();
        assert_eq!(stats.total_papers, 2);
        assert!(stats.last_update.is_some());
        assert!(stats.last_sync.is_none());
    }

    #[tokio::test]
    async fn test_get_and_search_require_input() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        store.upsert_papers(&[paper("a", "Alpha")]).await.unwrap();

        assert!(matches!(
            get_paper(&store, " ").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            get_paper(&store, "zzz").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(get_paper(&store, "a").await.unwrap().title, "Alpha");

        assert!(search_papers(&store, "", 10).await.is_err());
        let results = search_papers(&store, "ALPHA", 10).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.query, "ALPHA");
    }
}
