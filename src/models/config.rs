//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed endpoint and HTTP behavior
    #[serde(default)]
    pub feed: FeedConfig,

    /// Quality filter thresholds
    #[serde(default)]
    pub filter: FilterConfig,

    /// Pipeline defaults
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Where papers and the sync log are kept
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(AppError::validation("feed.base_url is empty"));
        }
        url::Url::parse(&self.feed.base_url)
            .map_err(|e| AppError::validation(format!("feed.base_url is invalid: {e}")))?;
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.feed.max_concurrent == 0 {
            return Err(AppError::validation("feed.max_concurrent must be > 0"));
        }
        if self.filter.min_score > 100 {
            return Err(AppError::validation("filter.min_score must be <= 100"));
        }
        if self.pipeline.default_query.trim().is_empty() {
            return Err(AppError::validation("pipeline.default_query is empty"));
        }
        Ok(())
    }
}

/// Feed endpoint and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Query endpoint of the bibliographic API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Number of results requested when none is given
    #[serde(default = "defaults::limit")]
    pub default_limit: usize,

    /// Maximum concurrent queries in a batch sync
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay between queries of a batch sync in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            default_limit: defaults::limit(),
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Quality filter thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Minimum Level 2 score to keep a paper
    #[serde(default = "defaults::min_score")]
    pub min_score: u8,

    /// Drop papers not updated within this many days (0 = unlimited)
    #[serde(default = "defaults::max_age_days")]
    pub max_age_days: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_score: defaults::min_score(),
            max_age_days: defaults::max_age_days(),
        }
    }
}

/// Pipeline defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Query used when neither a query nor a preset is given
    #[serde(default = "defaults::query")]
    pub default_query: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_query: defaults::query(),
        }
    }
}

/// Storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `papers.json` and `sync_log.json`
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Feed defaults
    pub fn base_url() -> String {
        "http://export.arxiv.org/api/query".into()
    }
    pub fn user_agent() -> String {
        "genesis/0.1 (+https://arxiv.org/help/api)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn limit() -> usize {
        50
    }
    pub fn max_concurrent() -> usize {
        2
    }
    pub fn request_delay() -> u64 {
        3000
    }

    // Filter defaults
    pub fn min_score() -> u8 {
        60
    }
    pub fn max_age_days() -> u32 {
        365
    }

    // Pipeline defaults
    pub fn query() -> String {
        "machine learning".into()
    }

    // Storage defaults
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
}
