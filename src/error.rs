// src/error.rs

//! Unified error handling for the ingestion pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport-level failure talking to the feed (DNS, connect, timeout, body read)
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Feed answered with something other than 200 OK
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// Response body is not a readable Atom feed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Lookup miss in a paper store
    #[error("Paper not found: {0}")]
    NotFound(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a decode error.
    pub fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode(message.to_string())
    }

    /// Create a not-found error for a paper ID.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came from the feed boundary (fetch, status or decode).
    pub fn is_feed_error(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::UnexpectedStatus(_) | Self::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = AppError::UnexpectedStatus(503);
        assert_eq!(err.to_string(), "Unexpected status code: 503");
        assert!(err.is_feed_error());
    }

    #[test]
    fn test_not_found_is_not_feed_error() {
        let err = AppError::not_found("2301.00001v1");
        assert_eq!(err.to_string(), "Paper not found: 2301.00001v1");
        assert!(!err.is_feed_error());
    }
}
