// src/pipeline/sync.rs

//! Sync pipeline: Fetch → Normalize → Recency → Gate/Score → Validate → Persist.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Config, Paper, SearchPreset};
use crate::services::filter::QualityFilter;
use crate::services::validation::{ValidationSummary, validate_paper, validate_papers};
use crate::services::{FilterResult, PaperProvider};
use crate::storage::{PaperStorage, UpsertStats};
use crate::utils::console;

const TOTAL_STEPS: usize = 4;

/// Effective parameters of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOptions {
    pub query: String,
    pub limit: usize,
    pub min_score: u8,
    /// 0 disables the recency filter
    pub max_age_days: u32,
    pub skip_filter: bool,
    /// Preset the parameters came from, if any
    pub preset: Option<&'static str>,
}

/// Values given explicitly on the command line; these win over preset and config.
#[derive(Debug, Clone, Default)]
pub struct SyncOverrides {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub min_score: Option<u8>,
    pub max_age_days: Option<u32>,
    pub skip_filter: bool,
}

impl SyncOptions {
    /// Options from configuration defaults alone.
    pub fn from_config(config: &Config) -> Self {
        Self {
            query: config.pipeline.default_query.clone(),
            limit: config.feed.default_limit,
            min_score: config.filter.min_score,
            max_age_days: config.filter.max_age_days,
            skip_filter: false,
            preset: None,
        }
    }

    /// Take query and recommended thresholds from a preset.
    pub fn with_preset(self, preset: &SearchPreset) -> Self {
        Self {
            query: preset.query.to_string(),
            min_score: preset.min_score,
            max_age_days: preset.max_age_days,
            preset: Some(preset.name),
            ..self
        }
    }

    /// Layer config defaults, an optional preset and explicit overrides.
    pub fn resolve(
        config: &Config,
        preset: Option<&str>,
        overrides: &SyncOverrides,
    ) -> Result<Self> {
        let mut options = Self::from_config(config);

        if let Some(name) = preset {
            let preset = SearchPreset::get(name).ok_or_else(|| {
                AppError::config(format!(
                    "Unknown preset: {:?}. Use `presets` to see available options.",
                    name
                ))
            })?;
            options = options.with_preset(preset);
        }

        if let Some(query) = overrides.query.as_deref().map(str::trim) {
            if !query.is_empty() {
                options.query = query.to_string();
            }
        }
        if let Some(limit) = overrides.limit {
            options.limit = limit;
        }
        if let Some(min_score) = overrides.min_score {
            options.min_score = min_score;
        }
        if let Some(max_age_days) = overrides.max_age_days {
            options.max_age_days = max_age_days;
        }
        options.skip_filter = overrides.skip_filter;

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::validation("query is empty"));
        }
        if self.min_score > 100 {
            return Err(AppError::validation(format!(
                "min score {} is out of range 0-100",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Sync log entry, when a store was attached
    pub sync_id: Option<u64>,
    pub query: String,
    pub fetched: usize,
    /// Papers left after the recency filter
    pub recent: usize,
    /// Papers left after gating and scoring
    pub passed: usize,
    pub validation: ValidationSummary,
    pub stats: UpsertStats,
    pub persisted: bool,
    /// Papers that passed, in feed order, with scores attached
    pub papers: Vec<Paper>,
    /// Every filter evaluation; empty when the filter was skipped
    #[serde(skip)]
    pub results: Vec<FilterResult>,
}

/// Keep papers updated strictly after `now - max_age_days`. 0 keeps everything.
pub fn retain_recent(papers: Vec<Paper>, max_age_days: u32, now: DateTime<Utc>) -> Vec<Paper> {
    if max_age_days == 0 {
        return papers;
    }
    let cutoff = now - chrono::Duration::days(i64::from(max_age_days));
    papers.into_iter().filter(|p| p.updated_at > cutoff).collect()
}

/// Run one sync.
///
/// With a store attached the run is recorded in the sync log; a failing stage marks the
/// entry failed and its error is returned unchanged.
pub async fn run_sync(
    provider: &dyn PaperProvider,
    store: Option<&dyn PaperStorage>,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let sync_id = match store {
        Some(store) => Some(store.start_sync(&options.query).await?),
        None => None,
    };

    let result = run_stages(provider, store, options).await;

    match (store, sync_id) {
        (Some(store), Some(id)) => match result {
            Ok(mut report) => {
                store.complete_sync(id, report.fetched, report.stats).await?;
                report.sync_id = Some(id);
                Ok(report)
            }
            Err(error) => {
                if let Err(log_error) = store.fail_sync(id, &error.to_string()).await {
                    log::warn!("Failed to mark sync {} as failed: {}", id, log_error);
                }
                Err(error)
            }
        },
        _ => result,
    }
}

async fn run_stages(
    provider: &dyn PaperProvider,
    store: Option<&dyn PaperStorage>,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let mut report = SyncReport {
        query: options.query.clone(),
        ..SyncReport::default()
    };

    console::step(
        1,
        TOTAL_STEPS,
        &format!("Fetch - Querying {} for \"{}\"", provider.name(), options.query),
    );
    let papers = provider.fetch_papers(&options.query, options.limit).await?;
    report.fetched = papers.len();
    log::info!("Fetched {} papers for '{}'", papers.len(), options.query);

    console::step(2, TOTAL_STEPS, "Filter - Recency, gate and score");
    let papers = retain_recent(papers, options.max_age_days, Utc::now());
    report.recent = papers.len();
    if options.max_age_days > 0 {
        log::info!(
            "Time filter: {}/{} papers within {} days",
            report.recent,
            report.fetched,
            options.max_age_days
        );
    }

    let passed = if options.skip_filter {
        log::info!("Skipping quality filter");
        papers
    } else {
        let filter = QualityFilter::new(options.min_score);
        report.results = filter.apply(&papers);
        let passed = filter.select(report.results.clone());
        log::info!(
            "Quality filter: {}/{} papers passed (min score: {})",
            passed.len(),
            report.recent,
            options.min_score
        );
        passed
    };
    report.passed = passed.len();

    console::step(3, TOTAL_STEPS, "Validate - Checking record structure");
    report.validation = validate_papers(&passed);
    for issue in &report.validation.issues {
        log::warn!("Invalid paper {:?}: {}", issue.paper_id, issue);
    }
    let valid: Vec<Paper> = passed
        .iter()
        .filter(|p| validate_paper(p).is_empty())
        .cloned()
        .collect();

    console::step(4, TOTAL_STEPS, "Persist - Saving papers");
    match store {
        Some(store) if !valid.is_empty() => {
            report.stats = store.upsert_papers(&valid).await?;
            report.persisted = true;
        }
        Some(_) => log::info!("No papers passed the filter, nothing saved"),
        None => log::info!("No store attached, skipping persistence"),
    }

    report.papers = passed;
    Ok(report)
}

/// Run several syncs with bounded concurrency. Reports come back in input order.
pub async fn run_batch(
    provider: &dyn PaperProvider,
    store: Option<&dyn PaperStorage>,
    runs: &[SyncOptions],
    max_concurrent: usize,
    delay: Duration,
) -> Vec<Result<SyncReport>> {
    let mut stream = stream::iter(runs)
        .map(|options| run_sync(provider, store, options))
        .buffered(max_concurrent.max(1));

    let mut reports = Vec::with_capacity(runs.len());
    while let Some(result) = stream.next().await {
        if let Err(error) = &result {
            log::warn!("Sync failed: {}", error);
        }
        reports.push(result);

        if delay.as_millis() > 0 && reports.len() < runs.len() {
            tokio::time::sleep(delay).await;
        }
    }
    reports
}
