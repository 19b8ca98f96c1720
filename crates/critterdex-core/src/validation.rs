//! Guards applied to everything a provider hands back to the UI.
//!
//! Upstream wikis are untrusted: a sprite URL must be plain `http`/`https`,
//! and a thumbnail filename that gets spliced into a CDN path must be a
//! single safe path segment.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static THUMBNAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w\-.]+$").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Parse `candidate` and accept it only if its scheme is `http` or `https`.
pub fn checked_url(candidate: &str) -> Option<Url> {
    Url::parse(candidate).ok().and_then(web_only)
}

/// Keep `url` only if its scheme is `http` or `https`.
pub fn web_only(url: Url) -> Option<Url> {
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// `true` if `candidate` parses as an `http`/`https` URL.
pub fn is_valid_url(candidate: &str) -> bool {
    checked_url(candidate).is_some()
}

/// `true` if `thumb` is a non-empty run of word characters, `-` and `.`.
///
/// Rejects `/`, `\`, `%`, whitespace and anything else that could escape the
/// CDN directory it is appended to.
pub fn is_valid_thumbnail(thumb: &str) -> bool {
    THUMBNAIL_PATTERN.is_match(thumb) && !thumb.split('.').all(str::is_empty)
}
