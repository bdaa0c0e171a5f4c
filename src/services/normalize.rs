// src/services/normalize.rs

//! Record normalization.
//!
//! Turns a [`RawEntry`] into a canonical [`Paper`]. Every function here is total:
//! missing or malformed input degrades to an empty string, a skipped list item, an
//! unchanged identifier or the Unix epoch.

use chrono::{DateTime, Utc};

use crate::models::{Link, LinkType, Paper, RawAuthor, RawCategory, RawEntry, RawLink};
use crate::utils::host_contains_any;

/// Hosts whose links count as source-code repositories.
pub const CODE_HOSTS: &[&str] = &["github.com", "gitlab.com"];

/// Path segment preceding the identifier in feed ID URLs.
const ABS_SEGMENT: &str = "/abs/";

/// Normalize one feed entry.
pub fn normalize(entry: &RawEntry) -> Paper {
    Paper {
        id: extract_id(&entry.id),
        title: clean_text(&entry.title),
        abstract_text: clean_text(&entry.summary),
        authors: extract_authors(&entry.authors),
        categories: extract_categories(&entry.categories),
        updated_at: parse_timestamp(&entry.updated),
        published_at: parse_timestamp(&entry.published),
        comments: clean_text(&entry.comment),
        doi: entry.doi.trim().to_string(),
        journal_ref: entry.journal_ref.trim().to_string(),
        links: extract_links(&entry.links),
        score: 0,
        score_details: Vec::new(),
    }
}

/// Normalize a batch of entries, keeping feed order.
pub fn normalize_all(entries: &[RawEntry]) -> Vec<Paper> {
    entries.iter().map(normalize).collect()
}

/// Extract the paper identifier from a feed ID URL.
///
/// `"http://arxiv.org/abs/2301.00001v1"` → `"2301.00001v1"`; an ID without an `/abs/`
/// segment is returned unchanged.
pub fn extract_id(raw_id: &str) -> String {
    let raw_id = raw_id.trim();
    match raw_id.split_once(ABS_SEGMENT) {
        Some((_, id)) => id.to_string(),
        None => raw_id.to_string(),
    }
}

/// Trim, turn newlines into spaces and collapse runs of spaces.
pub fn clean_text(s: &str) -> String {
    let mut text = s.trim().replace('\n', " ");
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text
}

pub fn extract_authors(authors: &[RawAuthor]) -> Vec<String> {
    authors
        .iter()
        .map(|a| a.name.trim())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

pub fn extract_categories(categories: &[RawCategory]) -> Vec<String> {
    categories
        .iter()
        .map(|c| c.term.trim())
        .filter(|term| !term.is_empty())
        .map(String::from)
        .collect()
}

/// Classify links, dropping those without a URL.
pub fn extract_links(links: &[RawLink]) -> Vec<Link> {
    links
        .iter()
        .filter(|l| !l.href.is_empty())
        .map(|l| Link {
            url: l.href.clone(),
            link_type: classify_link(l),
            title: l.title.clone(),
        })
        .collect()
}

/// Link type by rule precedence: pdf, then abstract, then code, then other.
pub fn classify_link(link: &RawLink) -> LinkType {
    if link.mime_type.contains("pdf") || link.href.ends_with(".pdf") {
        LinkType::Pdf
    } else if link.rel == "alternate" {
        LinkType::Abstract
    } else if host_contains_any(&link.href, CODE_HOSTS) {
        LinkType::Code
    } else {
        LinkType::Other
    }
}

/// Parse an RFC 3339 timestamp, falling back to the Unix epoch.
pub fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
