//! Search provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::SearchProvider`].

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGoProvider;
