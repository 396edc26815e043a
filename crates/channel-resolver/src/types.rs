use channel_id::ChannelId;
use std::time::Duration;

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: ChannelId,
    /// Display name candidate; only set when resolving a handle
    pub display_name: Option<String>,
}

impl Resolved {
    pub fn canonical(id: ChannelId) -> Self {
        Self {
            id,
            display_name: None,
        }
    }
}

/// Settings for [`crate::HttpChannelResolver`]
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL handle pages live under (`{base_url}/@handle`)
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    /// Bytes of a channel page read before scraping; the rest is discarded
    pub max_page_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            timeout: Duration::from_secs(5),
            user_agent: "Mozilla/5.0".to_string(),
            cache_ttl: Duration::from_secs(300), // 5 minutes
            cache_capacity: 10_000,
            max_page_bytes: 8 * 1024 * 1024,
        }
    }
}
