use regex::Regex;
use std::sync::LazyLock;

// Optional scheme, optional userinfo, optional `www.`, then the host up to
// the first `:`, `/` or `?`. Userinfo ends at the first `@` and cannot
// span a `/`.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:[^@/\n]+@)?(?:www\.)?([^:/?\n]+)").unwrap()
});

/// Bare domain of a citation URL, empty when nothing matches.
pub fn extract_domain(url: &str) -> String {
    DOMAIN_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
