//! Channel identifier handling
//!
//! Knows the shape of a canonical channel ID (`UC` + URL-safe body),
//! turns loosely formed user input into one of the accepted identifier
//! shapes, and extracts canonical IDs from channel page markup.

pub mod extract;
pub mod normalize;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub use extract::{extract_channel_id, Extractor, EXTRACTORS};
pub use normalize::normalize;

/// Two-character prefix every canonical channel ID starts with.
pub const CANONICAL_PREFIX: &str = "UC";

/// Minimum length of a canonical channel ID for general validation.
pub const CANONICAL_MIN_LEN: usize = 20;

/// Sigil that starts a channel handle.
pub const HANDLE_SIGIL: char = '@';

// Prefix followed by a URL-safe body; the length bound counts characters.
static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let min_body = CANONICAL_MIN_LEN - CANONICAL_PREFIX.len();
    Regex::new(&format!(r"^{CANONICAL_PREFIX}[A-Za-z0-9_-]{{{min_body},}}$")).unwrap()
});

/// Whether `s` has the canonical channel ID shape.
///
/// Path-shaped input is never canonical, even if it starts with the prefix.
pub fn is_canonical(s: &str) -> bool {
    CANONICAL_RE.is_match(s)
}

/// Whether `s` is a handle (`@name`).
pub fn is_handle(s: &str) -> bool {
    s.starts_with(HANDLE_SIGIL)
}

/// A validated canonical channel ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Parse a canonical channel ID, rejecting anything without the canonical shape
    pub fn parse(s: &str) -> Option<Self> {
        is_canonical(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(format!("not a canonical channel ID: {value}"))
        }
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}
