//! Canonical link keys for deduplication.
//!
//! Two links that differ only in scheme/host case, a default port, a
//! trailing slash, a fragment, query-parameter order or tracking parameters
//! produce the same key.

use url::Url;

/// Exact tracking parameter names dropped from the key.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "ref", "si", "feature"];

/// Any parameter starting with this prefix is dropped too.
const UTM_PREFIX: &str = "utm_";

/// Canonical dedup key for `link`.
///
/// Unparseable links are returned trimmed but otherwise unchanged.
///
/// # Examples
///
/// ```
/// use suburb_search::orchestrator::link::link_key;
///
/// let a = link_key("https://Example.COM/news/?b=2&a=1#top");
/// let b = link_key("https://example.com/news?a=1&b=2&utm_source=x");
/// assert_eq!(a, b);
/// ```
pub fn link_key(link: &str) -> String {
    let trimmed = link.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    url.set_fragment(None);

    if matches!((url.scheme(), url.port()), ("http", Some(80)) | ("https", Some(443))) {
        let _ = url.set_port(None);
    }

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(params);
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with(UTM_PREFIX) || TRACKING_PARAMS.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_case_and_default_port_ignored() {
        assert_eq!(
            link_key("HTTPS://News.Example.COM:443/Story"),
            "https://news.example.com/Story"
        );
    }

    #[test]
    fn path_case_preserved() {
        assert_ne!(link_key("https://a.com/Story"), link_key("https://a.com/story"));
    }

    #[test]
    fn trailing_slash_and_fragment_dropped() {
        assert_eq!(link_key("https://a.com/suburb/#map"), "https://a.com/suburb");
        assert_eq!(link_key("https://a.com/"), "https://a.com/");
    }

    #[test]
    fn tracking_params_dropped_and_rest_sorted() {
        assert_eq!(
            link_key("https://a.com/p?z=1&utm_campaign=x&a=2&UTM_Source=y&fbclid=q"),
            "https://a.com/p?a=2&z=1"
        );
    }

    #[test]
    fn non_default_port_kept() {
        assert_eq!(link_key("http://a.com:8080/x"), "http://a.com:8080/x");
    }

    #[test]
    fn unparseable_link_returned_trimmed() {
        assert_eq!(link_key("  not a url "), "not a url");
        assert_eq!(link_key(""), "");
    }
}
