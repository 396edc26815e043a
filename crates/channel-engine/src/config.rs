use std::time::Duration;

use crate::rate_limit::RateLimitPolicy;

/// Tunables for [`crate::ChannelService`]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub global_limit: RateLimitPolicy,
    pub vote_limit: RateLimitPolicy,
    /// Identities allowed to set verification status
    pub admin_ids: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(10),
            cache_max_capacity: 100_000,
            global_limit: RateLimitPolicy::new(50, Duration::from_secs(10)),
            vote_limit: RateLimitPolicy::new(1, Duration::from_secs(60)),
            admin_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.global_limit.points, 50);
        assert_eq!(config.global_limit.window, Duration::from_secs(10));
        assert_eq!(config.vote_limit.points, 1);
        assert_eq!(config.vote_limit.window, Duration::from_secs(60));
        assert!(config.admin_ids.is_empty());
    }
}
