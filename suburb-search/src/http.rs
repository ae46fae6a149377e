//! HTTP client construction for the search provider.
//!
//! One client is built per provider instance. It carries a browser-like
//! header set, a cookie jar and a User-Agent picked once at construction.

use std::time::Duration;

use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::SearchConfig;
use crate::error::SearchError;

const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Results are Australian-centric, so ask for en-AU content first.
const ACCEPT_LANGUAGE: &str = "en-AU,en;q=0.9";

/// Connection setup gets a fixed slice of the overall provider timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// Build the provider's [`reqwest::Client`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the configured User-Agent is not a
/// valid header value or the TLS backend fails to initialise.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let user_agent = match config.user_agent.as_deref() {
        Some(custom) => custom.to_owned(),
        None => pick_user_agent().to_owned(),
    };
    let user_agent = HeaderValue::from_str(&user_agent)
        .map_err(|e| SearchError::Config(format!("invalid user_agent: {e}")))?;

    let timeout = config.provider_timeout();
    reqwest::Client::builder()
        .default_headers(default_headers(user_agent))
        .cookie_store(true)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}

fn default_headers(user_agent: HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, user_agent);
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
    headers
}

/// Pick a browser User-Agent at random.
pub fn pick_user_agent() -> &'static str {
    let index = rand::thread_rng().gen_range(0..BROWSER_USER_AGENTS.len());
    BROWSER_USER_AGENTS[index]
}
