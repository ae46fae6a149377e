//! Per-category deduplication by link and capping.
//!
//! The first occurrence of a link wins and insertion order is preserved.
//! Deduplication always runs before the cap, so duplicates never push
//! unique results out of a category.

use std::collections::HashSet;

use crate::types::ClassifiedResult;

use super::link::link_key;

/// How links are compared when deduplicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkIdentity {
    /// Byte-for-byte link comparison.
    Exact,
    /// Compare [`link_key`] forms.
    Normalized,
}

impl LinkIdentity {
    fn key(self, link: &str) -> String {
        match self {
            Self::Exact => link.to_string(),
            Self::Normalized => link_key(link),
        }
    }
}

/// Remove later results whose link was already seen.
pub fn deduplicate(results: Vec<ClassifiedResult>, identity: LinkIdentity) -> Vec<ClassifiedResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|result| seen.insert(identity.key(&result.link)))
        .collect()
}

/// Deduplicate, then keep at most `cap` results.
pub fn dedup_and_cap(
    results: Vec<ClassifiedResult>,
    identity: LinkIdentity,
    cap: usize,
) -> Vec<ClassifiedResult> {
    let mut unique = deduplicate(results, identity);
    unique.truncate(cap);
    unique
}
