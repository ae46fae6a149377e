//! Search orchestrator: plan, execute under rate limit and cache, classify,
//! deduplicate and cap.
//!
//! [`search::SearchOrchestrator`] drives a plan's queries concurrently; the
//! sibling modules hold the pure post-processing steps.

pub mod dedup;
pub mod link;
pub mod search;
pub mod summary;

pub use search::SearchOrchestrator;
