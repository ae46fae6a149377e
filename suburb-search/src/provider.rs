//! Trait definition for the external free-text search provider.
//!
//! The orchestrator only ever talks to a provider through
//! [`SearchProvider`], so production scrapers and test stubs are
//! interchangeable.

use crate::error::SearchError;
use crate::types::RawResult;

/// A free-text search backend.
///
/// Implementors handle their own request construction, HTTP and parsing.
/// Failures should be reported as transient [`SearchError`] variants
/// (`Http`, `Timeout`, `Throttled`, `Parse`); the orchestrator retries them.
/// Every call counts against the rate budget, retries included.
///
/// All implementations must be `Send + Sync` for concurrent queries.
pub trait SearchProvider: Send + Sync {
    /// Run one query and return up to `max_results` raw results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the response cannot be
    /// parsed, or the provider is throttling requests.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RawResult>, SearchError>> + Send;

    /// Human-readable provider name for logs.
    fn name(&self) -> &'static str;
}
