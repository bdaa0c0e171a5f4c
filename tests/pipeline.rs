//! End-to-end sync against a mocked feed and a temporary store.

use chrono::{Duration, SecondsFormat, Utc};
use genesis::error::AppError;
use genesis::models::{Config, LinkType, SyncStatus};
use genesis::pipeline::{self, SyncOptions, SyncOverrides};
use genesis::services::ArxivClient;
use genesis::storage::{LocalStorage, PaperStorage};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry(id: &str, title: &str, summary: &str, comment: &str, updated: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{id}</id>
    <updated>{updated}</updated>
    <published>{updated}</published>
    <title>{title}</title>
    <summary>{summary}</summary>
    <author><name>John Doe</name></author>
    <arxiv:comment>{comment}</arxiv:comment>
    <link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/{id}" rel="related" type="application/pdf"/>
    <link href="https://github.com/user/repo" rel="related"/>
    <category term="cs.LG"/>
  </entry>"#
    )
}

fn feed() -> String {
    let recent = (Utc::now() - Duration::days(3)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let stale = (Utc::now() - Duration::days(900)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let entries = [
        entry(
            "2401.00001v2",
            "Strong Empirical Study",
            "We run ablation experiments on benchmark datasets against a baseline.\n    We discuss limitations.",
            "Accepted at ICML 2024",
            &recent,
        ),
        entry(
            "2401.00002v1",
            "A Revolutionary Framework",
            "A groundbreaking framework for everything.",
            "",
            &recent,
        ),
        entry(
            "1801.00003v1",
            "Old But Good",
            "We run ablation experiments on benchmark datasets against a baseline.",
            "Accepted at NeurIPS 2018",
            &stale,
        ),
    ];

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title>ArXiv Query</title>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

async fn mock_feed(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:machine learning"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer, storage: &TempDir) -> Config {
    let mut config = Config::default();
    config.feed.base_url = format!("{}/api/query", server.uri());
    config.feed.request_delay_ms = 0;
    config.storage.dir = storage.path().to_path_buf();
    config
}

#[tokio::test]
async fn sync_fetches_filters_and_persists() {
    let server = mock_feed(feed()).await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp);
    let store = LocalStorage::new(&config.storage.dir);
    let client = ArxivClient::new(&config.feed).unwrap();

    let options = SyncOptions::resolve(&config, None, &SyncOverrides::default()).unwrap();
    let report = pipeline::run_sync(&client, Some(&store), &options).await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.recent, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.stats.new, 1);

    let paper = store.get("2401.00001v2").await.unwrap();
    assert_eq!(paper.score, 85);
    assert_eq!(paper.version(), 2);
    assert_eq!(
        paper.abstract_text,
        "We run ablation experiments on benchmark datasets against a baseline. We discuss limitations."
    );
    let types: Vec<_> = paper.links.iter().map(|l| l.link_type).collect();
    assert_eq!(types, vec![LinkType::Abstract, LinkType::Pdf, LinkType::Code]);

    let stats = pipeline::store_stats(&store).await.unwrap();
    assert_eq!(stats.total_papers, 1);
    let last_sync = stats.last_sync.unwrap();
    assert_eq!(last_sync.status, SyncStatus::Completed);
    assert_eq!(last_sync.papers_fetched, 3);
}

#[tokio::test]
async fn repeated_sync_updates_instead_of_duplicating() {
    let server = mock_feed(feed()).await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp);
    let store = LocalStorage::new(&config.storage.dir);
    let client = ArxivClient::new(&config.feed).unwrap();
    let options = SyncOptions::resolve(&config, None, &SyncOverrides::default()).unwrap();

    pipeline::run_sync(&client, Some(&store), &options).await.unwrap();
    let second = pipeline::run_sync(&client, Some(&store), &options).await.unwrap();

    assert_eq!(second.stats.new, 0);
    assert_eq!(second.stats.updated, 1);
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(store.sync_history(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn unlimited_age_keeps_old_papers() {
    let server = mock_feed(feed()).await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp);
    let store = LocalStorage::new(&config.storage.dir);
    let client = ArxivClient::new(&config.feed).unwrap();

    let overrides = SyncOverrides {
        max_age_days: Some(0),
        ..SyncOverrides::default()
    };
    let options = SyncOptions::resolve(&config, None, &overrides).unwrap();
    let report = pipeline::run_sync(&client, Some(&store), &options).await.unwrap();

    assert_eq!(report.recent, 3);
    assert_eq!(report.passed, 2);

    let page = pipeline::list_papers(&store, 10, 0).await.unwrap();
    let ids: Vec<_> = page.papers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2401.00001v2", "1801.00003v1"]);

    let found = pipeline::search_papers(&store, "old but", 10).await.unwrap();
    assert_eq!(found.count, 1);
}

#[tokio::test]
async fn upstream_failure_is_recorded_and_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp);
    let store = LocalStorage::new(&config.storage.dir);
    let client = ArxivClient::new(&config.feed).unwrap();
    let options = SyncOptions::resolve(&config, None, &SyncOverrides::default()).unwrap();

    let err = pipeline::run_sync(&client, Some(&store), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnexpectedStatus(503)));

    let last = store.latest_sync().await.unwrap().unwrap();
    assert_eq!(last.status, SyncStatus::Failed);
    assert_eq!(store.count().await.unwrap(), 0);
}
