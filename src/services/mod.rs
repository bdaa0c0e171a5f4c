//! Service layer for the ingestion pipeline.
//!
//! This module contains the business logic for:
//! - Feed fetching (`ArxivClient`, behind the `PaperProvider` trait)
//! - Atom decoding (`parse_feed`)
//! - Record normalization (`normalize`)
//! - Quality gating and scoring (`QualityFilter`)
//! - Structural validation (`validate_papers`)

pub mod atom;
pub mod feed;
pub mod filter;
pub mod normalize;
pub mod validation;

pub use atom::parse_feed;
pub use feed::{ArxivClient, PaperProvider};
pub use filter::{FilterResult, QualityFilter};
pub use normalize::{normalize, normalize_all};
pub use validation::{ValidationIssue, ValidationSummary, validate_paper, validate_papers};
