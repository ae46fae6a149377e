//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the rate budget, caching, retries, result caps
//! and query planning. The defaults are tuned for polite use of a free
//! search provider.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backoff::BackoffPolicy;
use crate::error::SearchError;
use crate::planner::QueryPlanMode;

/// Longest accepted rate-limit window: one day.
pub const MAX_TIME_WINDOW_SECONDS: f64 = 86_400.0;
/// Longest accepted cache TTL: one year.
pub const MAX_CACHE_TTL_SECONDS: u64 = 365 * 86_400;
/// Longest accepted provider timeout: one hour.
pub const MAX_PROVIDER_TIMEOUT_SECONDS: u64 = 3_600;
/// Upper bound for backoff delays and rate-limit jitter: one hour.
pub const MAX_DELAY_MS: u64 = 3_600_000;

/// Configuration for suburb aggregation.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides. Missing fields in a serialised config take defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum provider calls within any trailing `time_window_seconds`.
    pub max_requests_per_window: usize,
    /// Length of the sliding rate-limit window in seconds.
    pub time_window_seconds: f64,
    /// Random extra delay range `(min, max)` in milliseconds added after a
    /// rate-limit wait, so waiters do not all wake at the same instant.
    pub rate_limit_jitter_ms: (u64, u64),
    /// How long cached provider results stay fresh. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Upper bound on cached query entries.
    pub cache_max_entries: u64,
    /// Total provider attempts per query, including the first.
    pub retry_attempts: u32,
    /// Delay schedule between failed attempts.
    pub backoff: BackoffPolicy,
    /// Upper bound for any planned query's `max_results`.
    pub per_query_result_cap: usize,
    /// Maximum results kept per category after deduplication.
    pub per_category_result_cap: usize,
    /// Byte budget for each result summary.
    pub summary_max_bytes: usize,
    /// Broad (one query per category) or targeted (several per category).
    pub query_plan_mode: QueryPlanMode,
    /// Locality qualifier appended to every query, e.g. the city.
    pub region: String,
    /// Maximum queries executing at the same time for one aggregation.
    pub max_concurrent_queries: usize,
    /// Timeout for a single provider call in seconds.
    pub provider_timeout_seconds: u64,
    /// Deduplicate on a normalised link rather than the exact string.
    pub normalize_links: bool,
    /// Area aliases applied after lowercasing, e.g. postcode to suburb.
    pub area_aliases: HashMap<String, String>,
    /// Whether to request safe search filtering from the provider.
    pub safe_search: bool,
    /// Custom User-Agent string. If `None`, rotates through a built-in list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: 18,
            time_window_seconds: 1.0,
            rate_limit_jitter_ms: (0, 50),
            cache_ttl_seconds: 3600,
            cache_max_entries: 1_000,
            retry_attempts: 3,
            backoff: BackoffPolicy::default(),
            per_query_result_cap: 10,
            per_category_result_cap: 20,
            summary_max_bytes: 200,
            query_plan_mode: QueryPlanMode::Broad,
            region: "Melbourne".into(),
            max_concurrent_queries: 4,
            provider_timeout_seconds: 8,
            normalize_links: true,
            area_aliases: HashMap::from([("3030".to_string(), "point cook".to_string())]),
            safe_search: true,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error naming the first
    /// invalid field.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_requests_per_window == 0 {
            return Err(SearchError::Config(
                "max_requests_per_window must be greater than 0".into(),
            ));
        }
        if !self.time_window_seconds.is_finite() || self.time_window_seconds <= 0.0 {
            return Err(SearchError::Config(
                "time_window_seconds must be a positive number".into(),
            ));
        }
        if self.time_window_seconds > MAX_TIME_WINDOW_SECONDS {
            return Err(SearchError::Config(format!(
                "time_window_seconds must be at most {MAX_TIME_WINDOW_SECONDS}"
            )));
        }
        if self.rate_limit_jitter_ms.0 > self.rate_limit_jitter_ms.1 {
            return Err(SearchError::Config(
                "rate_limit_jitter_ms min must be <= max".into(),
            ));
        }
        if self.rate_limit_jitter_ms.1 > MAX_DELAY_MS {
            return Err(SearchError::Config(format!(
                "rate_limit_jitter_ms max must be at most {MAX_DELAY_MS}"
            )));
        }
        if self.cache_ttl_seconds > MAX_CACHE_TTL_SECONDS {
            return Err(SearchError::Config(format!(
                "cache_ttl_seconds must be at most {MAX_CACHE_TTL_SECONDS}"
            )));
        }
        if self.retry_attempts == 0 {
            return Err(SearchError::Config(
                "retry_attempts must be greater than 0".into(),
            ));
        }
        if self.backoff.base_delay_ms > self.backoff.max_delay_ms {
            return Err(SearchError::Config(
                "backoff base_delay_ms must be <= max_delay_ms".into(),
            ));
        }
        if self.backoff.max_delay_ms > MAX_DELAY_MS {
            return Err(SearchError::Config(format!(
                "backoff max_delay_ms must be at most {MAX_DELAY_MS}"
            )));
        }
        if self.per_query_result_cap == 0 {
            return Err(SearchError::Config(
                "per_query_result_cap must be greater than 0".into(),
            ));
        }
        if self.per_category_result_cap == 0 {
            return Err(SearchError::Config(
                "per_category_result_cap must be greater than 0".into(),
            ));
        }
        if self.summary_max_bytes == 0 {
            return Err(SearchError::Config(
                "summary_max_bytes must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_queries == 0 {
            return Err(SearchError::Config(
                "max_concurrent_queries must be greater than 0".into(),
            ));
        }
        if self.provider_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "provider_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.provider_timeout_seconds > MAX_PROVIDER_TIMEOUT_SECONDS {
            return Err(SearchError::Config(format!(
                "provider_timeout_seconds must be at most {MAX_PROVIDER_TIMEOUT_SECONDS}"
            )));
        }
        Ok(())
    }

    /// The rate-limit window as a [`Duration`].
    ///
    /// Only meaningful on a validated config.
    pub fn time_window(&self) -> Duration {
        Duration::from_secs_f64(self.time_window_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_requests_per_window, 18);
        assert!((config.time_window_seconds - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.cache_ttl_seconds, 3600);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.per_query_result_cap, 10);
        assert_eq!(config.per_category_result_cap, 20);
        assert_eq!(config.query_plan_mode, QueryPlanMode::Broad);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn default_aliases_include_point_cook_postcode() {
        let config = SearchConfig::default();
        assert_eq!(
            config.area_aliases.get("3030").map(String::as_str),
            Some("point cook")
        );
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_requests_rejected() {
        let config = SearchConfig {
            max_requests_per_window: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_requests_per_window"));
    }

    #[test]
    fn non_positive_window_rejected() {
        for window in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SearchConfig {
                time_window_seconds: window,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("time_window_seconds"));
        }
    }

    #[test]
    fn zero_retry_attempts_rejected() {
        let config = SearchConfig {
            retry_attempts: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retry_attempts"));
    }

    #[test]
    fn zero_caps_rejected() {
        let config = SearchConfig {
            per_query_result_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("per_query"));

        let config = SearchConfig {
            per_category_result_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("per_category"));
    }

    #[test]
    fn invalid_jitter_range_rejected() {
        let config = SearchConfig {
            rate_limit_jitter_ms: (100, 10),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jitter"));
    }

    #[test]
    fn backoff_base_above_max_rejected() {
        let config = SearchConfig {
            backoff: BackoffPolicy {
                base_delay_ms: 5_000,
                max_delay_ms: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backoff"));
    }

    #[test]
    fn oversized_durations_rejected() {
        let cases = [
            (
                SearchConfig {
                    cache_ttl_seconds: u64::MAX / 2,
                    ..Default::default()
                },
                "cache_ttl_seconds",
            ),
            (
                SearchConfig {
                    time_window_seconds: 1e30,
                    ..Default::default()
                },
                "time_window_seconds",
            ),
            (
                SearchConfig {
                    provider_timeout_seconds: u64::MAX,
                    ..Default::default()
                },
                "provider_timeout_seconds",
            ),
            (
                SearchConfig {
                    rate_limit_jitter_ms: (0, u64::MAX),
                    ..Default::default()
                },
                "rate_limit_jitter_ms",
            ),
            (
                SearchConfig {
                    backoff: BackoffPolicy {
                        max_delay_ms: u64::MAX,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                "max_delay_ms",
            ),
        ];
        for (config, field) in cases {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, SearchError::Config(_)));
            assert!(err.to_string().contains(field), "{err} should name {field}");
        }
    }

    #[test]
    fn limits_themselves_are_valid() {
        let config = SearchConfig {
            cache_ttl_seconds: MAX_CACHE_TTL_SECONDS,
            time_window_seconds: MAX_TIME_WINDOW_SECONDS,
            provider_timeout_seconds: MAX_PROVIDER_TIMEOUT_SECONDS,
            rate_limit_jitter_ms: (0, MAX_DELAY_MS),
            backoff: BackoffPolicy {
                max_delay_ms: MAX_DELAY_MS,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.time_window(), Duration::from_secs(86_400));
    }

    #[test]
    fn zero_cache_ttl_is_valid() {
        let config = SearchConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fractional_window_converts_to_duration() {
        let config = SearchConfig {
            time_window_seconds: 0.5,
            ..Default::default()
        };
        assert_eq!(config.time_window(), Duration::from_millis(500));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"retry_attempts": 5, "query_plan_mode": "targeted"}"#)
                .expect("deserialize");
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.query_plan_mode, QueryPlanMode::Targeted);
        assert_eq!(config.max_requests_per_window, 18);
    }
}
