//! Best-effort identifier normalization
//!
//! Turns whatever a client sent (canonical ID, handle, channel URL, bare
//! path) into one of the shapes the resolver understands. Never fails and
//! never performs I/O: anything unrecognised comes back unchanged.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::{is_canonical, is_handle};

/// Host used to synthesize an absolute URL for bare paths.
const SYNTHETIC_BASE: &str = "https://youtube.com";

/// Substring that marks input as a platform URL even without a path separator.
const PLATFORM_HOST: &str = "youtube.com";

static CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[a-zA-Z0-9_-]{22}$|UC[a-zA-Z0-9_-]{22}/").unwrap());

static LEADING_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[^/\s]+").unwrap());

static EMBEDDED_CANONICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"UC[a-zA-Z0-9_-]{20,}").unwrap());

/// Normalize a raw identifier
pub fn normalize(raw: &str) -> String {
    if is_canonical(raw) || is_handle(raw) {
        return raw.to_string();
    }

    if raw.contains(PLATFORM_HOST) || raw.contains('/') {
        if let Some(url) = parse_as_url(raw) {
            if let Some(found) = scan_segments(&url) {
                return found;
            }
        } else if let Some(found) = regex_fallback(raw) {
            return found;
        }
    }

    raw.to_string()
}

/// Parse `raw` as an absolute URL, synthesizing a base when it is a bare path
fn parse_as_url(raw: &str) -> Option<Url> {
    if raw.contains("://") {
        return Url::parse(raw).ok();
    }
    let synthesized = if raw.starts_with('/') {
        format!("{SYNTHETIC_BASE}{raw}")
    } else {
        format!("{SYNTHETIC_BASE}/{raw}")
    };
    Url::parse(&synthesized).ok()
}

/// First path segment that is canonical-shaped or a handle
fn scan_segments(url: &Url) -> Option<String> {
    url.path_segments()?
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .find(|segment| is_canonical(segment) || is_handle(segment))
}

/// Ordered regex extraction used when the input cannot be parsed as a URL
fn regex_fallback(raw: &str) -> Option<String> {
    if let Some(m) = CANONICAL_RE.find(raw) {
        return Some(m.as_str().trim_end_matches('/').to_string());
    }
    if let Some(m) = LEADING_HANDLE_RE.find(raw) {
        return Some(m.as_str().to_string());
    }
    EMBEDDED_CANONICAL_RE
        .find(raw)
        .map(|m| m.as_str().to_string())
}
