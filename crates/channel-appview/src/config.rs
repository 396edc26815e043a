use std::env;
use std::time::Duration;

use channel_engine::{EngineConfig, RateLimitPolicy};
use channel_resolver::ResolverConfig;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub cache_ttl: Duration,
    pub cache_max_capacity: u64,
    pub rate_limit: RateLimitPolicy,
    pub vote_limit: RateLimitPolicy,
    pub resolver_base_url: String,
    pub resolver_timeout: Duration,
    pub resolver_cache_ttl: Duration,
    pub resolver_max_page_bytes: usize,
    pub jwt_secret: Option<String>,
    pub admin_ids: Vec<String>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let port = parse_var("PORT").unwrap_or(3000);

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://channels.sqlite?mode=rwc".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| split_list(&s))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let cache_ttl = Duration::from_millis(parse_var("CACHE_TTL_MS").unwrap_or(10_000));
        let cache_max_capacity = parse_var("CACHE_MAX_CAPACITY").unwrap_or(100_000);

        let rate_limit = RateLimitPolicy::new(
            parse_positive("RATE_LIMIT_POINTS").unwrap_or(50),
            Duration::from_secs(parse_positive("RATE_LIMIT_WINDOW_SECS").unwrap_or(10)),
        );
        let vote_limit = RateLimitPolicy::new(
            parse_positive("VOTE_LIMIT_POINTS").unwrap_or(1),
            Duration::from_secs(parse_positive("VOTE_LIMIT_WINDOW_SECS").unwrap_or(60)),
        );

        let resolver_base_url = env::var("RESOLVER_BASE_URL")
            .unwrap_or_else(|_| "https://www.youtube.com".to_string());
        let resolver_timeout =
            Duration::from_secs(parse_positive("RESOLVER_TIMEOUT_SECS").unwrap_or(5));
        let resolver_cache_ttl =
            Duration::from_secs(parse_var("RESOLVER_CACHE_TTL_SECS").unwrap_or(300));

        let resolver_max_page_bytes =
            parse_positive("RESOLVER_MAX_PAGE_BYTES").unwrap_or(8 * 1024 * 1024);

        let jwt_secret = env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());

        let admin_ids = env::var("ADMIN_IDS")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        Self {
            port,
            database_url,
            cors_origins,
            cache_ttl,
            cache_max_capacity,
            rate_limit,
            vote_limit,
            resolver_base_url,
            resolver_timeout,
            resolver_cache_ttl,
            resolver_max_page_bytes,
            jwt_secret,
            admin_ids,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache_ttl: self.cache_ttl,
            cache_max_capacity: self.cache_max_capacity,
            global_limit: self.rate_limit,
            vote_limit: self.vote_limit,
            admin_ids: self.admin_ids.clone(),
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            base_url: self.resolver_base_url.clone(),
            timeout: self.resolver_timeout,
            cache_ttl: self.resolver_cache_ttl,
            max_page_bytes: self.resolver_max_page_bytes,
            ..ResolverConfig::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_positive<T: std::str::FromStr + PartialOrd + Default>(key: &str) -> Option<T> {
    parse_var(key).filter(|v: &T| *v > T::default())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_engine_config_carries_limits() {
        let config = Config {
            port: 3000,
            database_url: "sqlite::memory:".to_string(),
            cors_origins: vec!["*".to_string()],
            cache_ttl: Duration::from_secs(10),
            cache_max_capacity: 10,
            rate_limit: RateLimitPolicy::new(50, Duration::from_secs(10)),
            vote_limit: RateLimitPolicy::new(1, Duration::from_secs(60)),
            resolver_base_url: "https://www.youtube.com".to_string(),
            resolver_timeout: Duration::from_secs(5),
            resolver_cache_ttl: Duration::from_secs(300),
            resolver_max_page_bytes: 1024,
            jwt_secret: None,
            admin_ids: vec!["42".to_string()],
        };

        let engine = config.engine_config();
        assert_eq!(engine.global_limit.points, 50);
        assert_eq!(engine.vote_limit.window, Duration::from_secs(60));
        assert_eq!(engine.admin_ids, vec!["42".to_string()]);

        let resolver = config.resolver_config();
        assert_eq!(resolver.timeout, Duration::from_secs(5));
        assert_eq!(resolver.user_agent, "Mozilla/5.0");
        assert_eq!(resolver.max_page_bytes, 1024);
    }
}
