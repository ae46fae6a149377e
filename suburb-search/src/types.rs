//! Core types: categories, planned queries, provider results and the report.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// The five topical buckets a suburb report is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Schools, childcare and education results.
    Schools,
    /// Hospitals, clinics and health services.
    Hospitals,
    /// Development projects, transport and roads.
    Infrastructure,
    /// Crime statistics and safety.
    Crime,
    /// Property prices and market trends.
    Property,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 5] = [
        Self::Schools,
        Self::Hospitals,
        Self::Infrastructure,
        Self::Crime,
        Self::Property,
    ];

    /// Returns the lowercase key used in the serialised report.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Schools => "schools",
            Self::Hospitals => "hospitals",
            Self::Infrastructure => "infrastructure",
            Self::Crime => "crime",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| SearchError::UnknownCategory(s.to_string()))
    }
}

/// School sector inferred from result text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Public,
    Private,
    Religious,
    Unknown,
}

/// A single planned provider query. Immutable once planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Exact text sent to the provider; also the cache key.
    pub text: String,
    /// Category the query's results are filed under.
    pub category: Category,
    /// Maximum number of provider results to request.
    pub max_results: usize,
}

/// A result as returned by the search provider.
///
/// `link` is the identity key for deduplication; the provider does not
/// guarantee it is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub link: String,
    pub body: String,
}

/// A relevant result filed under a category, ready for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedResult {
    pub title: String,
    pub link: String,
    /// Body truncated to the configured byte budget.
    pub summary: String,
    /// First date token found in the body, or empty.
    pub date: String,
    pub category: Category,
    /// Only set for [`Category::Schools`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_type: Option<SchoolType>,
}

/// The aggregate returned for one area lookup.
///
/// Serialises with one key per category (always all five) plus `suburb`
/// and `timestamp`.
#[derive(Debug, Clone, Serialize)]
pub struct SuburbReport {
    pub suburb: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub results: BTreeMap<Category, Vec<ClassifiedResult>>,
}

impl SuburbReport {
    /// An empty report for `suburb` with every category present.
    pub fn new(suburb: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let results = Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        Self {
            suburb: suburb.into(),
            timestamp,
            results,
        }
    }

    /// Results for one category, in discovery order.
    pub fn results_for(&self, category: Category) -> &[ClassifiedResult] {
        self.results
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of results across all categories.
    pub fn total_results(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_classified(link: &str, category: Category) -> ClassifiedResult {
        ClassifiedResult {
            title: "Title".into(),
            link: link.into(),
            summary: "Summary".into(),
            date: String::new(),
            category,
            school_type: None,
        }
    }

    #[test]
    fn category_display_is_lowercase() {
        assert_eq!(Category::Schools.to_string(), "schools");
        assert_eq!(Category::Infrastructure.to_string(), "infrastructure");
        assert_eq!(Category::Property.to_string(), "property");
    }

    #[test]
    fn category_from_str_accepts_any_case() {
        assert_eq!("Crime".parse::<Category>().ok(), Some(Category::Crime));
        assert_eq!(" HOSPITALS ".parse::<Category>().ok(), Some(Category::Hospitals));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "parks".parse::<Category>().unwrap_err();
        assert!(matches!(err, SearchError::UnknownCategory(_)));
    }

    #[test]
    fn category_serde_uses_report_keys() {
        let json = serde_json::to_string(&Category::Schools).expect("serialize");
        assert_eq!(json, "\"schools\"");
        let decoded: Category = serde_json::from_str("\"crime\"").expect("deserialize");
        assert_eq!(decoded, Category::Crime);
    }

    #[test]
    fn new_report_has_every_category() {
        let report = SuburbReport::new("testville", Utc::now());
        assert_eq!(report.results.len(), 5);
        assert_eq!(report.total_results(), 0);
        for category in Category::ALL {
            assert!(report.results_for(category).is_empty());
        }
    }

    #[test]
    fn report_serialises_flat_category_keys() {
        let mut report = SuburbReport::new("testville", Utc::now());
        report
            .results
            .insert(Category::Crime, vec![make_classified("https://a.com", Category::Crime)]);

        let value = serde_json::to_value(&report).expect("serialize");
        for key in ["schools", "hospitals", "infrastructure", "crime", "property"] {
            assert!(value[key].is_array(), "missing key {key}");
        }
        assert_eq!(value["suburb"], "testville");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["crime"][0]["link"], "https://a.com");
        assert_eq!(value["crime"][0]["date"], "");
    }

    #[test]
    fn school_type_only_serialised_when_present() {
        let plain = make_classified("https://a.com", Category::Crime);
        let value = serde_json::to_value(&plain).expect("serialize");
        assert!(value.get("school_type").is_none());

        let school = ClassifiedResult {
            school_type: Some(SchoolType::Religious),
            ..make_classified("https://b.com", Category::Schools)
        };
        let value = serde_json::to_value(&school).expect("serialize");
        assert_eq!(value["school_type"], "religious");
    }

    #[test]
    fn raw_result_deserialises_provider_shape() {
        let json = r#"{"title": "T", "link": "https://x.com", "body": "B"}"#;
        let raw: RawResult = serde_json::from_str(json).expect("deserialize");
        assert_eq!(raw.link, "https://x.com");
        assert_eq!(raw.body, "B");
    }
}
