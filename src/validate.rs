use regex::Regex;
use std::sync::LazyLock;

/// Accepted target URL grammar: http(s) scheme, then a dotted hostname with a
/// 2-6 letter top-level label, `localhost` or a dotted-quad IPv4 address,
/// an optional port and an optional path/query/fragment tail.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("URL_PATTERN regex")
});

/// Returns true if `url` is a syntactically valid HTTP(S) target.
///
/// This is checked before any network call is made.
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    URL_PATTERN.is_match(url)
}
