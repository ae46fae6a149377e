//! Core orchestrator: plan → execute (cache | rate-limited provider with
//! retry) → classify → dedup → cap.
//!
//! Provider failures never abort an aggregation. A query that still fails
//! after its retry budget contributes nothing and the rest of the report is
//! returned as normal.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt;

use crate::backoff::{Sleeper, TokioSleeper};
use crate::cache::ResultCache;
use crate::classifier::RelevanceClassifier;
use crate::config::SearchConfig;
use crate::dates::extract_date;
use crate::error::SearchError;
use crate::planner::QueryPlanner;
use crate::provider::SearchProvider;
use crate::rate_limiter::RateLimiter;
use crate::types::{Category, ClassifiedResult, Query, RawResult, SuburbReport};

use super::dedup::{dedup_and_cap, LinkIdentity};
use super::summary::truncate_summary;

/// Drives a query plan through the cache, rate limiter and provider and
/// assembles the per-category report.
///
/// The rate limiter and cache are shared handles: pass the same `Arc`s to
/// several orchestrators to share one rate budget and one cache between
/// them, or fresh ones to isolate them.
pub struct SearchOrchestrator<P, S = TokioSleeper> {
    provider: P,
    sleeper: S,
    limiter: Arc<RateLimiter>,
    cache: Arc<ResultCache>,
    classifier: RelevanceClassifier,
    planner: QueryPlanner,
    config: SearchConfig,
}

impl<P: SearchProvider> SearchOrchestrator<P, TokioSleeper> {
    /// Create an orchestrator over shared limiter and cache instances.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(
        provider: P,
        limiter: Arc<RateLimiter>,
        cache: Arc<ResultCache>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            provider,
            sleeper: TokioSleeper,
            limiter,
            cache,
            classifier: RelevanceClassifier::default(),
            planner: QueryPlanner::from_config(&config),
            config,
        })
    }

    /// Create an orchestrator with its own limiter and cache built from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn from_config(provider: P, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let limiter = Arc::new(RateLimiter::from_config(&config));
        let cache = Arc::new(ResultCache::from_config(&config));
        Self::new(provider, limiter, cache, config)
    }
}

impl<P: SearchProvider, S: Sleeper> SearchOrchestrator<P, S> {
    /// Replace the sleep primitive used between retry attempts.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> SearchOrchestrator<P, S2> {
        SearchOrchestrator {
            provider: self.provider,
            sleeper,
            limiter: self.limiter,
            cache: self.cache,
            classifier: self.classifier,
            planner: self.planner,
            config: self.config,
        }
    }

    pub fn with_classifier(mut self, classifier: RelevanceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_planner(mut self, planner: QueryPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the full report for `area`.
    ///
    /// # Pipeline
    ///
    /// 1. Normalise the area (trim, lowercase, alias lookup)
    /// 2. Plan the category-tagged queries
    /// 3. Execute up to `max_concurrent_queries` queries at a time
    /// 4. Keep results whose body is relevant to the query's category
    /// 5. Summarise, extract dates, classify school sector
    /// 6. Per category: dedup by link (first wins), then cap
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArea`] for a blank area. Provider
    /// failures are never returned; they only shrink the report.
    pub async fn aggregate(&self, area: &str) -> Result<SuburbReport, SearchError> {
        let suburb = self.normalize_area(area)?;
        let plan = self.planner.plan(&suburb);
        tracing::debug!(queries = plan.len(), mode = ?self.planner.mode(), "query plan built");

        let mut collected: BTreeMap<Category, Vec<ClassifiedResult>> = BTreeMap::new();
        let mut outcomes = futures::stream::iter(plan.iter())
            .map(|query| async move { (query, self.execute(query).await) })
            .buffer_unordered(self.config.max_concurrent_queries);

        while let Some((query, raw)) = outcomes.next().await {
            let bucket = collected.entry(query.category).or_default();
            let before = bucket.len();
            bucket.extend(
                raw.iter()
                    .filter(|r| self.classifier.is_relevant(query.category, &r.body))
                    .map(|r| self.classify(query.category, r)),
            );
            tracing::trace!(
                category = %query.category,
                raw = raw.len(),
                relevant = bucket.len() - before,
                "query results classified"
            );
        }

        let identity = if self.config.normalize_links {
            LinkIdentity::Normalized
        } else {
            LinkIdentity::Exact
        };

        let mut report = SuburbReport::new(suburb, Utc::now());
        for (category, results) in collected {
            let kept = dedup_and_cap(results, identity, self.config.per_category_result_cap);
            report.results.insert(category, kept);
        }

        tracing::info!(
            suburb = %report.suburb,
            results = report.total_results(),
            cache_hits = self.cache.hits(),
            "suburb report assembled"
        );
        Ok(report)
    }

    /// Resolve one query's raw results.
    ///
    /// A fresh cache entry is returned without touching the rate limiter or
    /// the provider. Otherwise each attempt first acquires a rate-limit slot,
    /// so retries count against the budget. After `retry_attempts` failures
    /// the query yields no results.
    pub async fn execute(&self, query: &Query) -> Arc<Vec<RawResult>> {
        if let Some(cached) = self.cache.get(&query.text).await {
            tracing::trace!(query = %query.text, "cache hit");
            return cached;
        }

        let attempts = self.config.retry_attempts.max(1);
        for attempt in 1..=attempts {
            self.limiter.acquire().await;

            match self.call_provider(query).await {
                Ok(mut results) => {
                    results.truncate(query.max_results);
                    let results = Arc::new(results);
                    self.cache.put(&query.text, Arc::clone(&results)).await;
                    tracing::trace!(query = %query.text, attempt, count = results.len(), "provider results");
                    return results;
                }
                Err(err) if attempt < attempts && err.is_transient() => {
                    let delay = self.config.backoff.delay_for(attempt);
                    tracing::debug!(
                        category = %query.category,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "provider call failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(err) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        category = %query.category,
                        attempts = attempt,
                        error = %err,
                        "query failed, contributing no results"
                    );
                    break;
                }
            }
        }

        Arc::new(Vec::new())
    }

    async fn call_provider(&self, query: &Query) -> Result<Vec<RawResult>, SearchError> {
        let timeout = self.config.provider_timeout();
        match tokio::time::timeout(timeout, self.provider.search(&query.text, query.max_results)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(SearchError::Timeout(format!(
                "{} did not respond within {}s",
                self.provider.name(),
                timeout.as_secs()
            ))),
        }
    }

    fn classify(&self, category: Category, raw: &RawResult) -> ClassifiedResult {
        let school_type = (category == Category::Schools)
            .then(|| self.classifier.classify_school_type(&raw.title, &raw.body));
        ClassifiedResult {
            title: raw.title.clone(),
            link: raw.link.clone(),
            summary: truncate_summary(&raw.body, self.config.summary_max_bytes),
            date: extract_date(&raw.body),
            category,
            school_type,
        }
    }

    /// Lowercase and trim `area`, then apply configured aliases.
    fn normalize_area(&self, area: &str) -> Result<String, SearchError> {
        let normalized = area.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if normalized.is_empty() {
            return Err(SearchError::InvalidArea("area name must not be empty".into()));
        }
        Ok(self
            .config
            .area_aliases
            .get(&normalized)
            .map(|alias| alias.trim().to_lowercase())
            .unwrap_or(normalized))
    }
}
