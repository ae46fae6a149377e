//! Keyword relevance classification and school sector detection.
//!
//! Matching is a case-insensitive substring test over an explicit
//! [`KeywordConfig`]. Everything here is pure: no I/O, no shared state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Category, SchoolType};

/// Ordered keyword lists for school sector detection.
///
/// Checked public first, then private, then religious.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolTypeIndicators {
    pub public: Vec<String>,
    pub private: Vec<String>,
    pub religious: Vec<String>,
}

impl Default for SchoolTypeIndicators {
    fn default() -> Self {
        Self {
            public: to_strings(&["public", "state school", "government school", "state primary", "state secondary"]),
            private: to_strings(&["private", "independent"]),
            religious: to_strings(&[
                "catholic", "christian", "anglican", "islamic", "jewish", "lutheran", "religious",
            ]),
        }
    }
}

/// Category → keyword configuration for the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub categories: HashMap<Category, Vec<String>>,
    /// Education-context phrases that also make a result relevant to
    /// [`Category::Schools`].
    pub school_context: Vec<String>,
    pub school_types: SchoolTypeIndicators,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        let categories = HashMap::from([
            (
                Category::Schools,
                to_strings(&[
                    "school", "college", "education", "student", "teacher", "kindergarten",
                    "childcare", "primary", "secondary",
                ]),
            ),
            (
                Category::Hospitals,
                to_strings(&[
                    "hospital", "medical", "health", "clinic", "emergency", "doctor", "patient",
                ]),
            ),
            (
                Category::Infrastructure,
                to_strings(&[
                    "development", "projects", "infrastructure", "railway", "school",
                    "hospital", "road",
                ]),
            ),
            (
                Category::Crime,
                to_strings(&["crime", "safety", "security", "incident", "police"]),
            ),
            (
                Category::Property,
                to_strings(&["property", "house", "price", "market", "real estate"]),
            ),
        ]);
        Self {
            categories,
            school_context: to_strings(&[
                "curriculum", "enrolment", "enrollment", "naplan", "vce", "atar", "classroom",
                "campus", "zone",
            ]),
            school_types: SchoolTypeIndicators::default(),
        }
    }
}

/// Labels raw result text as relevant to a category.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    keywords: KeywordConfig,
}

impl Default for RelevanceClassifier {
    fn default() -> Self {
        Self::new(KeywordConfig::default())
    }
}

impl RelevanceClassifier {
    /// Build a classifier. Keywords are lowercased and blank entries dropped.
    pub fn new(keywords: KeywordConfig) -> Self {
        let categories = keywords
            .categories
            .into_iter()
            .map(|(category, words)| (category, normalise(words)))
            .collect();
        let keywords = KeywordConfig {
            categories,
            school_context: normalise(keywords.school_context),
            school_types: SchoolTypeIndicators {
                public: normalise(keywords.school_types.public),
                private: normalise(keywords.school_types.private),
                religious: normalise(keywords.school_types.religious),
            },
        };
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordConfig {
        &self.keywords
    }

    /// Whether any keyword for `category` occurs in `text`.
    ///
    /// For [`Category::Schools`] the education-context phrases also count.
    /// A category with no configured keywords matches nothing.
    pub fn is_relevant(&self, category: Category, text: &str) -> bool {
        let haystack = text.to_lowercase();
        let primary = self
            .keywords
            .categories
            .get(&category)
            .is_some_and(|words| contains_any(&haystack, words));

        primary
            || (category == Category::Schools
                && contains_any(&haystack, &self.keywords.school_context))
    }

    /// Infer a school's sector from its title and body.
    pub fn classify_school_type(&self, title: &str, body: &str) -> SchoolType {
        let haystack = format!("{title} {body}").to_lowercase();
        let indicators = &self.keywords.school_types;

        if contains_any(&haystack, &indicators.public) {
            SchoolType::Public
        } else if contains_any(&haystack, &indicators.private) {
            SchoolType::Private
        } else if contains_any(&haystack, &indicators.religious) {
            SchoolType::Religious
        } else {
            SchoolType::Unknown
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn normalise(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
