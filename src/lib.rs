// src/lib.rs

//! Genesis: arXiv feed ingestion with two-level quality gating.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
