//! DuckDuckGo provider. Scrapes the HTML endpoint; no API key needed.
//!
//! Uses the HTML-only version at `https://html.duckduckgo.com/html/`
//! which requires no JavaScript.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::SearchProvider;
use crate::types::RawResult;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use url::Url;

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML search scraper.
///
/// Holds one HTTP client for its lifetime so cookies and connections are
/// reused across queries.
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    safe_search: bool,
}

impl DuckDuckGoProvider {
    /// Build a provider from config.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            safe_search: config.safe_search,
        })
    }

    /// Unwrap `//duckduckgo.com/l/?uddg=<encoded target>&rut=...` redirect
    /// links to their target. Direct links pass through.
    fn extract_url(href: &str) -> Option<String> {
        let full_href = if href.starts_with("//") {
            format!("https:{href}")
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&full_href).ok()?;

        if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        } else {
            Some(full_href)
        }
    }
}

impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawResult>, SearchError> {
        tracing::trace!(query, max_results, "DuckDuckGo search");

        let mut params = vec![("q", query)];
        if self.safe_search {
            params.push(("kp", "1"));
        }

        let response = self
            .client
            .post(ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(format!("DuckDuckGo request timed out: {e}"))
                } else {
                    SearchError::Http(format!("DuckDuckGo request failed: {e}"))
                }
            })?;

        check_status(response.status())?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, max_results)
    }

    fn name(&self) -> &'static str {
        "DuckDuckGo"
    }
}

/// Map DuckDuckGo status codes onto provider errors.
///
/// DDG answers rate-limited clients with 429, or with a 202 challenge page
/// that contains no results.
fn check_status(status: StatusCode) -> Result<(), SearchError> {
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::ACCEPTED {
        return Err(SearchError::Throttled(format!("DuckDuckGo returned {status}")));
    }
    if !status.is_success() {
        return Err(SearchError::Http(format!("DuckDuckGo HTTP error: {status}")));
    }
    Ok(())
}

/// Parse a DuckDuckGo HTML results page, skipping ads and results
/// without a title or link.
pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<RawResult>, SearchError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| SearchError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| SearchError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| SearchError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut results = Vec::new();

    for element in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(link) = title_el
            .value()
            .attr("href")
            .and_then(DuckDuckGoProvider::extract_url)
        else {
            continue;
        };

        let body = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(RawResult { title, link, body });
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(results)
}
