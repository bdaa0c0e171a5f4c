// src/services/feed.rs

//! Feed fetching.
//!
//! One GET per call against the arXiv query API. Non-200 answers, transport failures
//! and undecodable bodies surface as distinct [`AppError`] variants; nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, Paper, RawEntry};
use crate::services::atom::parse_feed;
use crate::services::normalize::normalize_all;
use crate::utils::http::create_client;

/// Page size used when the caller asks for zero results.
pub const DEFAULT_LIMIT: usize = 10;

/// Query parameters owned by the client; any others on the base URL are kept.
const OWNED_PARAMS: [&str; 3] = ["search_query", "start", "max_results"];

/// Source of normalized papers.
#[async_trait]
pub trait PaperProvider: Send + Sync {
    /// Fetch up to `limit` papers matching `query`.
    async fn fetch_papers(&self, query: &str, limit: usize) -> Result<Vec<Paper>>;

    /// Provider name for logs and reports.
    fn name(&self) -> &str;
}

/// arXiv Atom API client.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Client,
    base_url: Url,
}

impl ArxivClient {
    /// Create a client from feed configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = create_client(config)?;
        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing HTTP client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request URL for a query.
    pub fn build_url(&self, query: &str, limit: usize) -> Url {
        let mut url = self.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !OWNED_PARAMS.iter().any(|owned| k == owned))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("search_query", &format!("all:{}", query))
            .append_pair("start", "0")
            .append_pair("max_results", &limit.to_string());
        url
    }

    /// Fetch and decode raw entries.
    pub async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<RawEntry>> {
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let url = self.build_url(query, limit);
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let entries = parse_feed(&body)?;
        log::debug!("Decoded {} entries for query '{}'", entries.len(), query);
        Ok(entries)
    }
}

#[async_trait]
impl PaperProvider for ArxivClient {
    async fn fetch_papers(&self, query: &str, limit: usize) -> Result<Vec<Paper>> {
        let entries = self.fetch(query, limit).await?;
        Ok(normalize_all(&entries))
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2301.00001v1</id>
    <title>Test Paper Title</title>
    <summary>This is the abstract of the test paper.
    It spans multiple lines.</summary>
    <updated>2023-01-15T10:00:00Z</updated>
    <published>2023-01-01T00:00:00Z</published>
    <author>
      <name>John Doe</name>
    </author>
    <author>
      <name>Jane Smith</name>
    </author>
    <category term="cs.AI" />
    <category term="cs.LG" />
  </entry>
</feed>"#;

    fn client_for(server: &MockServer) -> ArxivClient {
        ArxivClient::with_client(Client::new(), &format!("{}/api/query", server.uri())).unwrap()
    }

    #[test]
    fn test_build_url() {
        let client =
            ArxivClient::with_client(Client::new(), "http://export.arxiv.org/api/query").unwrap();
        let url = client.build_url("machine learning", 25);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("search_query".to_string(), "all:machine learning".to_string()),
                ("start".to_string(), "0".to_string()),
                ("max_results".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_keeps_foreign_params() {
        let client = ArxivClient::with_client(
            Client::new(),
            "http://localhost/api/query?sortBy=submittedDate&start=5",
        )
        .unwrap();
        let url = client.build_url("llm", 5);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("sortBy".to_string(), "submittedDate".to_string()));
        assert_eq!(pairs.iter().filter(|(k, _)| k == "start").count(), 1);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ArxivClient::with_client(Client::new(), "not a url").unwrap_err();
        assert!(matches!(err, AppError::Url(_)));
    }

    #[tokio::test]
    async fn test_fetch_papers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("search_query", "all:machine learning"))
            .and(query_param("start", "0"))
            .and(query_param("max_results", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/atom+xml")
                    .set_body_string(MOCK_RESPONSE),
            )
            .expect(1)
            .mount(&server)
            .await;

        let papers = client_for(&server)
            .fetch_papers("machine learning", 10)
            .await
            .unwrap();

        assert_eq!(papers.len(), 1);
        let paper = &papers[0];
        assert_eq!(paper.id, "2301.00001v1");
        assert_eq!(paper.title, "Test Paper Title");
        assert_eq!(
            paper.abstract_text,
            "This is the abstract of the test paper. It spans multiple lines."
        );
        assert_eq!(paper.authors, vec!["John Doe", "Jane Smith"]);
        assert_eq!(paper.categories, vec!["cs.AI", "cs.LG"]);
    }

    #[tokio::test]
    async fn test_zero_limit_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("max_results", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<feed></feed>"))
            .expect(1)
            .mount(&server)
            .await;

        let entries = client_for(&server).fetch("llm", 0).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("llm", 5).await.unwrap_err();
        assert!(matches!(err, AppError::UnexpectedStatus(500)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("this is not xml <<<"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("llm", 5).await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_fetch_error() {
        let client = ArxivClient::with_client(Client::new(), "http://127.0.0.1:1/api/query").unwrap();
        let err = client.fetch("llm", 5).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
