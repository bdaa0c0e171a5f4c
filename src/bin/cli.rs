//! Genesis CLI
//!
//! Fetches papers from arXiv, gates and scores them, and keeps the survivors in a local
//! JSON store that the other subcommands query.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use genesis::{
    error::Result,
    models::{Config, PRESET_GROUPS, Paper, SearchPreset, SyncLog},
    pipeline::{self, SyncOptions, SyncOverrides, SyncReport},
    services::ArxivClient,
    storage::{LocalStorage, PaperStorage},
    utils::{
        console::{self, Verbosity},
        truncate,
    },
};
use serde::Serialize;

/// Genesis - arXiv ingestion and quality gating
#[derive(Parser, Debug)]
#[command(
    name = "genesis",
    version,
    about = "Fetch, score and store research papers from arXiv"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "genesis.toml")]
    config: PathBuf,

    /// Storage directory (overrides storage.dir from the config)
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Only print errors and machine output
    #[arg(short, long)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, filter and store papers
    Sync {
        /// Search query (repeatable; several queries run as a batch)
        #[arg(long)]
        query: Vec<String>,

        /// Search preset (repeatable; see `presets`)
        #[arg(short, long)]
        preset: Vec<String>,

        /// Number of papers to fetch per query
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum score threshold (0-100)
        #[arg(long)]
        min_score: Option<u8>,

        /// Maximum paper age in days (0 = unlimited)
        #[arg(long)]
        max_age: Option<u32>,

        /// Keep every fetched paper regardless of quality
        #[arg(long)]
        skip_filter: bool,

        /// Do not touch the store
        #[arg(long)]
        dry_run: bool,
    },

    /// List available search presets
    Presets {
        /// Only show one group
        #[arg(long)]
        group: Option<String>,
    },

    /// List stored papers, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Show one stored paper
    Get { id: String },

    /// Search stored papers by title or abstract
    Search {
        query: String,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show store statistics
    Stats,

    /// Show recent sync runs
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Validate configuration and stored papers
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, true) => "debug",
        (false, false) => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_paper(index: usize, paper: &Paper) {
    let marker = if paper.score > 0 { "✅ " } else { "" };
    console::line(&format!("\n[{}] {}{}", index, marker, paper.title));
    if paper.score > 0 {
        console::sub_item(&format!(
            "Score: {}/100 | Updated: {}",
            paper.score,
            paper.updated_at.format("%Y-%m-%d")
        ));
        if !paper.score_details.is_empty() {
            console::sub_item(&format!("Details: {}", paper.score_details.join(", ")));
        }
    } else {
        console::sub_item(&format!(
            "Updated: {}",
            paper.updated_at.format("%Y-%m-%d")
        ));
    }
    console::sub_item(&format!("Authors: {}", paper.authors.join(", ")));
    console::sub_item(&format!("📄 Abstract: {}", paper.abs_url()));
    console::sub_item(&format!("📥 PDF:      {}", paper.pdf_url()));
    console::detail(&truncate(&paper.abstract_text, 300));
}

fn print_papers(papers: &[Paper]) {
    for (i, paper) in papers.iter().enumerate() {
        print_paper(i + 1, paper);
    }
}

fn print_report(report: &SyncReport, options: &SyncOptions) {
    console::header(&format!(
        "📚 \"{}\": {}/{} papers passed",
        report.query, report.passed, report.recent
    ));
    print_papers(&report.papers);

    for result in report.results.iter().filter(|r| !r.passes(options.min_score)) {
        console::detail(&format!(
            "rejected {} (level1: {}, score: {}): {}",
            result.paper.id,
            result.passed_level1,
            result.score,
            result.details.join(", ")
        ));
    }

    console::summary(
        "Sync",
        &[
            ("Query", report.query.clone()),
            ("Preset", options.preset.unwrap_or("-").to_string()),
            ("Fetched", report.fetched.to_string()),
            (
                "Recent",
                format!("{} (max age {} days)", report.recent, options.max_age_days),
            ),
            (
                "Passed",
                if options.skip_filter {
                    format!("{} (filter skipped)", report.passed)
                } else {
                    format!("{} (min score {})", report.passed, options.min_score)
                },
            ),
            ("Invalid", report.validation.invalid.to_string()),
            ("New", report.stats.new.to_string()),
            ("Updated", report.stats.updated.to_string()),
        ],
    );
}

fn print_presets(group: Option<&str>) {
    console::header("Available Search Presets");
    for name in PRESET_GROUPS.iter().filter(|g| group.is_none_or(|want| want == **g)) {
        console::line(&format!("\n  [{}]", name));
        for preset in SearchPreset::in_group(name) {
            console::sub_item(&format!("{:<18} {}", preset.name, preset.description));
            console::detail(&format!(
                "query: {} | min score: {} | max age: {} days",
                preset.query, preset.min_score, preset.max_age_days
            ));
        }
    }
    console::separator();
    console::line("  Usage: genesis sync --preset <name> [--limit N]");
}

fn print_history(logs: &[SyncLog]) {
    console::header("Sync History");
    for entry in logs {
        let finished = entry
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        console::line(&format!(
            "#{} [{:?}] \"{}\" started {} finished {}",
            entry.id,
            entry.status,
            entry.query,
            entry.started_at.format("%Y-%m-%d %H:%M:%S"),
            finished
        ));
        console::sub_item(&format!(
            "fetched {} | new {} | updated {}",
            entry.papers_fetched, entry.papers_new, entry.papers_updated
        ));
        if let Some(error) = &entry.error {
            console::sub_item(&format!("error: {}", error));
        }
    }
}

/// Build the runs a `sync` invocation asks for.
fn sync_runs(
    config: &Config,
    queries: &[String],
    presets: &[String],
    base: &SyncOverrides,
) -> Result<Vec<SyncOptions>> {
    let mut runs = Vec::new();
    for preset in presets {
        runs.push(SyncOptions::resolve(config, Some(preset), base)?);
    }
    for query in queries {
        let overrides = SyncOverrides {
            query: Some(query.clone()),
            ..base.clone()
        };
        runs.push(SyncOptions::resolve(config, None, &overrides)?);
    }
    if runs.is_empty() {
        runs.push(SyncOptions::resolve(config, None, base)?);
    }
    Ok(runs)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    console::init(Verbosity::from_flags(cli.quiet || cli.json, cli.verbose));

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::load_or_default(&cli.config)
    };
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = dir.clone();
    }
    log::debug!("Storage directory: {}", config.storage.dir.display());

    let storage = LocalStorage::new(&config.storage.dir);

    match cli.command {
        Command::Sync {
            query,
            preset,
            limit,
            min_score,
            max_age,
            skip_filter,
            dry_run,
        } => {
            config.validate()?;
            let overrides = SyncOverrides {
                query: None,
                limit,
                min_score,
                max_age_days: max_age,
                skip_filter,
            };
            let runs = sync_runs(&config, &query, &preset, &overrides)?;
            for run in &runs {
                if let Some(name) = run.preset.and_then(SearchPreset::get) {
                    log::info!("Using preset: {} ({})", name.name, name.description);
                }
            }

            let client = ArxivClient::new(&config.feed)?;
            let store: Option<&dyn PaperStorage> = if dry_run { None } else { Some(&storage) };

            let results = if runs.len() == 1 {
                vec![pipeline::run_sync(&client, store, &runs[0]).await]
            } else {
                pipeline::run_batch(
                    &client,
                    store,
                    &runs,
                    config.feed.max_concurrent,
                    Duration::from_millis(config.feed.request_delay_ms),
                )
                .await
            };

            let mut first_error = None;
            let mut reports = Vec::new();
            for (result, options) in results.into_iter().zip(&runs) {
                match result {
                    Ok(report) => {
                        print_report(&report, options);
                        reports.push(report);
                    }
                    Err(e) => {
                        console::failure(&format!("Sync \"{}\" failed: {}", options.query, e));
                        if e.is_feed_error() {
                            console::sub_item("Check feed.base_url and network access, or retry later");
                        }
                        first_error.get_or_insert(e);
                    }
                }
            }

            if cli.json {
                print_json(&reports)?;
            }
            if !dry_run {
                log::info!("Total papers in store: {}", storage.count().await?);
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Command::Presets { group } => {
            if cli.json {
                let presets: Vec<&SearchPreset> = match &group {
                    Some(g) => SearchPreset::in_group(g).collect(),
                    None => SearchPreset::all().collect(),
                };
                print_json(&presets)?;
            } else {
                print_presets(group.as_deref());
            }
        }

        Command::List { limit, offset } => {
            let page = pipeline::list_papers(&storage, limit, offset).await?;
            if cli.json {
                print_json(&page)?;
            } else {
                console::header(&format!(
                    "Stored papers {}-{}",
                    offset + 1,
                    offset + page.count
                ));
                print_papers(&page.papers);
            }
        }

        Command::Get { id } => {
            let paper = pipeline::get_paper(&storage, &id).await?;
            if cli.json {
                print_json(&paper)?;
            } else {
                print_paper(1, &paper);
                console::sub_item(&format!("Categories: {}", paper.categories.join(", ")));
                if !paper.doi.is_empty() {
                    console::sub_item(&format!("DOI: {}", paper.doi));
                }
                if !paper.journal_ref.is_empty() {
                    console::sub_item(&format!("Journal: {}", paper.journal_ref));
                }
                if !paper.comments.is_empty() {
                    console::sub_item(&format!("Comments: {}", paper.comments));
                }
                for link in &paper.links {
                    console::sub_item(&format!("[{}] {}", link.link_type.as_str(), link.url));
                }
                console::line(&format!("\n{}", paper.abstract_text));
            }
        }

        Command::Search { query, limit } => {
            let results = pipeline::search_papers(&storage, &query, limit).await?;
            if cli.json {
                print_json(&results)?;
            } else {
                console::header(&format!(
                    "{} papers matching \"{}\"",
                    results.count, results.query
                ));
                print_papers(&results.papers);
            }
        }

        Command::Stats => {
            let stats = pipeline::store_stats(&storage).await?;
            if cli.json {
                print_json(&stats)?;
            } else {
                console::summary(
                    "Store",
                    &[
                        ("Total papers", stats.total_papers.to_string()),
                        (
                            "Last update",
                            stats
                                .last_update
                                .map(|t| t.to_rfc3339())
                                .unwrap_or_else(|| "-".to_string()),
                        ),
                        (
                            "Last sync",
                            stats
                                .last_sync
                                .map(|s| format!("#{} {:?} \"{}\"", s.id, s.status, s.query))
                                .unwrap_or_else(|| "-".to_string()),
                        ),
                        ("Storage", config.storage.dir.display().to_string()),
                        ("Data source", stats.data_source.to_string()),
                    ],
                );
            }
        }

        Command::History { limit } => {
            let logs = storage.sync_history(limit).await?;
            if cli.json {
                print_json(&logs)?;
            } else {
                print_history(&logs);
            }
        }

        Command::Validate => {
            let summary = pipeline::run_validate(&config, &storage).await?;
            if cli.json {
                print_json(&summary)?;
            }
        }
    }

    Ok(())
}
