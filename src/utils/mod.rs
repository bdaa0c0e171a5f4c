//! Utility functions and helpers.

pub mod console;
pub mod http;

use url::Url;

/// Extract the host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Whether the URL's host contains any of the given fragments.
pub fn host_contains_any(url_str: &str, fragments: &[&str]) -> bool {
    get_domain(url_str)
        .map(|host| fragments.iter().any(|f| host.contains(f)))
        .unwrap_or(false)
}

/// Shorten text to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
