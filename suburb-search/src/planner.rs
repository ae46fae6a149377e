//! Expands an area name into category-tagged provider queries.
//!
//! Two fixed template sets exist. Broad mode issues one query per
//! category; targeted mode issues several narrower queries per category
//! for better recall at a higher rate-budget cost. The template set is
//! versioned by [`PLAN_VERSION`].

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::types::{Category, Query};

/// Identifies the current template set. Bump when templates change.
pub const PLAN_VERSION: u32 = 2;

/// Which template set to plan with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryPlanMode {
    /// One query per category.
    #[default]
    Broad,
    /// Several targeted queries per category.
    Targeted,
}

/// `(category, topic terms, result cap)` appended after `"{area} {region}"`.
type Template = (Category, &'static str, usize);

const BROAD_TEMPLATES: &[Template] = &[
    (Category::Schools, "schools education past 10 years", 8),
    (Category::Hospitals, "hospitals medical health services", 8),
    (Category::Infrastructure, "infrastructure development projects past 10 years", 8),
    (Category::Crime, "crime rate statistics safety past 10 years", 8),
    (Category::Property, "property price trends market analysis past 10 years", 8),
];

const TARGETED_TEMPLATES: &[Template] = &[
    (Category::Schools, "public primary secondary schools", 10),
    (Category::Schools, "private independent schools", 10),
    (Category::Schools, "catholic religious schools", 10),
    (Category::Schools, "NAPLAN results school rankings", 5),
    (Category::Schools, "childcare kindergarten centres", 5),
    (Category::Hospitals, "hospitals emergency department", 10),
    (Category::Hospitals, "medical centres clinics GP", 10),
    (Category::Infrastructure, "infrastructure development projects past 10 years", 10),
    (Category::Infrastructure, "railway road transport upgrades", 10),
    (Category::Crime, "crime rate statistics safety past 10 years", 10),
    (Category::Crime, "police incidents news", 5),
    (Category::Property, "property price trends market analysis past 10 years", 10),
    (Category::Property, "median house price rental yield", 5),
];

/// Produces the query plan for an area.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    mode: QueryPlanMode,
    region: String,
    per_query_cap: usize,
}

impl QueryPlanner {
    /// Create a planner. Every template cap is clamped to `per_query_cap`.
    pub fn new(mode: QueryPlanMode, region: impl Into<String>, per_query_cap: usize) -> Self {
        Self {
            mode,
            region: region.into(),
            per_query_cap,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.query_plan_mode,
            config.region.clone(),
            config.per_query_result_cap,
        )
    }

    pub fn mode(&self) -> QueryPlanMode {
        self.mode
    }

    /// Expand `area` into the mode's fixed list of queries.
    ///
    /// Returns an empty plan for a blank area.
    pub fn plan(&self, area: &str) -> Vec<Query> {
        let area = area.trim();
        if area.is_empty() {
            return Vec::new();
        }

        let templates = match self.mode {
            QueryPlanMode::Broad => BROAD_TEMPLATES,
            QueryPlanMode::Targeted => TARGETED_TEMPLATES,
        };

        templates
            .iter()
            .map(|(category, terms, cap)| Query {
                text: self.query_text(area, terms),
                category: *category,
                max_results: (*cap).min(self.per_query_cap).max(1),
            })
            .collect()
    }

    fn query_text(&self, area: &str, terms: &str) -> String {
        let region = self.region.trim();
        if region.is_empty() {
            format!("{area} {terms}")
        } else {
            format!("{area} {region} {terms}")
        }
    }
}
