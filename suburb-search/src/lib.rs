//! # suburb-search
//!
//! Multi-category search aggregation for a named suburb.
//!
//! Given an area name, this crate plans a fixed set of category-tagged
//! queries, runs them against a free-text search provider under a
//! sliding-window rate limit with a short-TTL cache and bounded retries,
//! keeps results that mention the category's keywords, and returns a
//! deduplicated, capped list per category.
//!
//! ## Design
//!
//! - [`RateLimiter`] and [`ResultCache`] are explicit instances, injected
//!   into a [`SearchOrchestrator`], so lookups can share or isolate them
//! - Provider failures are retried with a [`BackoffPolicy`], then degrade
//!   that query to no results; a report is always returned
//! - Classification is pure keyword matching over a [`KeywordConfig`]
//! - Search queries are logged only at trace level

pub mod backoff;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod dates;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod planner;
pub mod provider;
pub mod providers;
pub mod rate_limiter;
pub mod types;

pub use backoff::{BackoffPolicy, BackoffStrategy, Sleeper, TokioSleeper};
pub use cache::{CacheStats, ResultCache};
pub use classifier::{KeywordConfig, RelevanceClassifier, SchoolTypeIndicators};
pub use config::SearchConfig;
pub use dates::extract_date;
pub use error::{Result, SearchError};
pub use orchestrator::SearchOrchestrator;
pub use planner::{QueryPlanMode, QueryPlanner, PLAN_VERSION};
pub use provider::SearchProvider;
pub use providers::DuckDuckGoProvider;
pub use rate_limiter::RateLimiter;
pub use types::{Category, ClassifiedResult, Query, RawResult, SchoolType, SuburbReport};

/// Build a report for `area` using DuckDuckGo and the given configuration.
///
/// Each call creates its own rate limiter and cache. To share a rate
/// budget or cache across lookups, build a [`SearchOrchestrator`] once and
/// call [`SearchOrchestrator::aggregate`] repeatedly.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::InvalidArea`] for a blank area. Provider failures are not
/// errors; affected categories are simply shorter or empty.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> suburb_search::Result<()> {
/// let config = suburb_search::SearchConfig::default();
/// let report = suburb_search::aggregate_for_area("point cook", &config).await?;
/// for result in report.results_for(suburb_search::Category::Crime) {
///     println!("{}: {}", result.title, result.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn aggregate_for_area(area: &str, config: &SearchConfig) -> Result<SuburbReport> {
    config.validate()?;
    let provider = DuckDuckGoProvider::new(config)?;
    let orchestrator = SearchOrchestrator::from_config(provider, config.clone())?;
    orchestrator.aggregate(area).await
}
