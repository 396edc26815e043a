//! Canonical ID extraction from channel page markup
//!
//! Each strategy is a pure function over the page body. They are tried in
//! order and the first hit wins.

use regex::Regex;
use std::sync::LazyLock;

/// A single extraction strategy: page body in, canonical ID out
pub type Extractor = fn(&str) -> Option<String>;

/// Strategies in priority order
pub static EXTRACTORS: &[(&str, Extractor)] = &[
    ("channel_id_field", from_channel_id_field),
    ("canonical_link", from_canonical_link),
];

// Strict 24-character form: 22 body characters, the last one constrained
// to the values the platform actually emits.
static CHANNEL_ID_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""channelId":"(UC[0-9A-Za-z_-]{21}[AQgw])""#).unwrap());

static CANONICAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<link rel="canonical" href="https://www\.youtube\.com/channel/(UC[0-9A-Za-z_-]+)""#,
    )
    .unwrap()
});

/// Embedded `"channelId":"UC…"` JSON field
pub fn from_channel_id_field(html: &str) -> Option<String> {
    CHANNEL_ID_FIELD_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// `<link rel="canonical">` pointing at a channel path
pub fn from_canonical_link(html: &str) -> Option<String> {
    CANONICAL_LINK_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Run every strategy in order and return the first extracted ID
pub fn extract_channel_id(html: &str) -> Option<String> {
    EXTRACTORS.iter().find_map(|(_, extract)| extract(html))
}
