//! Pipeline entry points.
//!
//! - `run_sync` / `run_batch`: Fetch, filter and persist papers for one or more queries
//! - `query`: List, get, search and summarize stored papers
//! - `run_validate`: Check configuration and stored papers

pub mod query;
pub mod sync;
pub mod validate;

pub use query::{
    PaperPage, SearchResults, StoreStats, clamp_limit, get_paper, list_papers, search_papers,
    store_stats,
};
pub use sync::{SyncOptions, SyncOverrides, SyncReport, retain_recent, run_batch, run_sync};
pub use validate::run_validate;
