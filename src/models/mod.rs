// src/models/mod.rs

//! Domain models for the ingestion pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod entry;
mod paper;
mod preset;
mod sync;

// Re-export all public types
pub use config::{Config, FeedConfig, FilterConfig, PipelineConfig, StorageConfig};
pub use entry::{RawAuthor, RawCategory, RawEntry, RawLink};
pub use paper::{Link, LinkType, Paper, version_of};
pub use preset::{GROUPS as PRESET_GROUPS, SearchPreset};
pub use sync::{SyncLog, SyncStatus};
