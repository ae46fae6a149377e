//! Error types for the suburb-search crate.
//!
//! Messages are stable strings suitable for display and for matching in
//! tests. Query text may appear in messages; nothing else from the provider
//! response does.

/// Errors that can occur while planning or running a suburb search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the search provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider call did not complete within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The provider signalled that we are sending too many requests.
    #[error("provider throttled: {0}")]
    Throttled(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The area name was empty after normalisation.
    #[error("invalid area: {0}")]
    InvalidArea(String),

    /// A category name that is not one of the five known buckets.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl SearchError {
    /// Whether this error came from the provider and may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout(_) | Self::Throttled(_) | Self::Parse(_)
        )
    }
}

/// Convenience type alias for suburb-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
