//! # brainvault-jobs
//!
//! Asynchronous enrichment pipeline for brainvault.
//!
//! This crate provides:
//! - Deterministic theme/project heuristics over a fixed lexicon
//! - A bounded, channel-fed enrichment worker (fire-and-forget,
//!   at-most-once, no ordering guarantee across ideas)
//! - Worker events via a broadcast channel
//!
//! ## Example
//!
//! ```ignore
//! use brainvault_jobs::{EnrichmentTask, EnrichmentWorker, WorkerConfig};
//!
//! let worker = EnrichmentWorker::new(repo, classifier, WorkerConfig::from_env());
//! let (queue, handle) = worker.start();
//!
//! // After persisting a new idea:
//! queue.dispatch(EnrichmentTask { idea_id, owner, content });
//!
//! // Graceful shutdown
//! handle.shutdown().await;
//! ```

pub mod enrichment;
pub mod worker;

// Re-export core types
pub use brainvault_core::*;

pub use enrichment::{derive_project, derive_theme, PROJECT_DEFAULT, THEME_DEFAULT};
pub use worker::{
    EnrichmentQueue, EnrichmentTask, EnrichmentWorker, WorkerConfig, WorkerEvent, WorkerHandle,
};
