//! Suburb research reports from web search.
//!
//! Thin host around [`suburb_search`]: configuration file handling and the
//! glue the `suburb-scout` binary uses to run a lookup.

pub mod config;
pub mod error;

pub use config::{ScoutConfig, DEFAULT_LOG_FILTER};
pub use error::{Result, ScoutError};
pub use suburb_search::{
    Category, ClassifiedResult, QueryPlanMode, SearchConfig, SuburbReport,
};

use suburb_search::{Query, QueryPlanner};

/// Run a full lookup for `area` against the live provider.
///
/// # Errors
///
/// Returns [`ScoutError::Search`] for invalid settings or a blank area.
pub async fn run_report(area: &str, config: &ScoutConfig) -> Result<SuburbReport> {
    tracing::info!(area, mode = ?config.search.query_plan_mode, "starting suburb lookup");
    let report = suburb_search::aggregate_for_area(area, &config.search).await?;
    Ok(report)
}

/// The queries a lookup for `area` would issue, without contacting the provider.
///
/// The area is used as given; alias resolution happens inside a lookup.
pub fn preview_plan(area: &str, config: &ScoutConfig) -> Vec<Query> {
    QueryPlanner::from_config(&config.search).plan(area.trim())
}

/// Render a report as JSON.
///
/// # Errors
///
/// Returns [`ScoutError::Config`] if serialization fails.
pub fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| ScoutError::Config(format!("failed to serialize output: {e}")))
}
