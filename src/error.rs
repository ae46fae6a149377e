//! Error types for the suburb-scout host.

use suburb_search::SearchError;

/// Top-level error type for the host crate.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the search engine.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;
