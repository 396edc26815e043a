use async_trait::async_trait;
use channel_id::{is_canonical, is_handle, ChannelId, EXTRACTORS};
use moka::future::Cache;
use reqwest::{Client, Response};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ResolveError, Result};
use crate::types::{Resolved, ResolverConfig};

/// Hosts whose channel pages may be fetched for URL-form identifiers
const PLATFORM_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

/// Resolves a normalized identifier to a canonical channel ID
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    async fn resolve(&self, normalized: &str) -> Result<Resolved>;
}

/// Resolver that scrapes channel pages over HTTP
pub struct HttpChannelResolver {
    client: Client,
    base_url: String,
    allowed_hosts: Vec<String>,
    max_page_bytes: usize,
    resolution_cache: Cache<String, Resolved>,
}

impl HttpChannelResolver {
    /// Create a new resolver with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut allowed_hosts: Vec<String> = PLATFORM_HOSTS.iter().map(|h| h.to_string()).collect();
        if let Some(host) = Url::parse(&base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        {
            if !allowed_hosts.contains(&host) {
                allowed_hosts.push(host);
            }
        }

        let resolution_cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            base_url,
            allowed_hosts,
            max_page_bytes: config.max_page_bytes,
            resolution_cache,
        })
    }

    /// Resolve a handle by scraping its channel page
    async fn resolve_handle(&self, handle: &str) -> Result<Resolved> {
        let url = format!("{}/{}", self.base_url, handle);
        let id = self.scrape(&url).await?;
        Ok(Resolved {
            id,
            display_name: Some(handle.to_string()),
        })
    }

    /// Resolve a full platform URL by scraping the page it points at
    async fn resolve_url(&self, url: &Url) -> Result<Resolved> {
        let id = self.scrape(url.as_str()).await?;
        Ok(Resolved::canonical(id))
    }

    /// Parse `raw` as a fetchable URL on one of the allowed hosts
    fn platform_url(&self, raw: &str) -> Option<Url> {
        let url = Url::parse(raw).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let host = url.host_str()?;
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed == host)
            .then_some(url)
    }

    /// Read at most `max_page_bytes` of the body
    async fn read_page(&self, mut response: Response, url: &str) -> Result<String> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_page_bytes - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                debug!(url = %url, limit = self.max_page_bytes, "Channel page truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn scrape(&self, url: &str) -> Result<ChannelId> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = %status, "Channel page fetch returned non-success status");
            return Err(ResolveError::ResolutionFailed(format!(
                "channel page returned status {status}"
            )));
        }

        let html = self.read_page(response, url).await?;

        for (strategy, extract) in EXTRACTORS {
            if let Some(raw_id) = extract(&html) {
                debug!(url = %url, strategy = *strategy, channel_id = %raw_id, "Extracted channel ID");
                return ChannelId::parse(&raw_id).ok_or_else(|| {
                    ResolveError::ResolutionFailed(format!("extracted ID is not canonical: {raw_id}"))
                });
            }
        }

        warn!(url = %url, "No channel ID found in page");
        Err(ResolveError::ResolutionFailed(
            "no channel ID found in page".to_string(),
        ))
    }
}

#[async_trait]
impl ChannelResolver for HttpChannelResolver {
    async fn resolve(&self, normalized: &str) -> Result<Resolved> {
        if is_canonical(normalized) {
            let id = ChannelId::parse(normalized)
                .ok_or_else(|| ResolveError::InvalidIdentifier(normalized.to_string()))?;
            return Ok(Resolved::canonical(id));
        }

        // Check cache
        if let Some(cached) = self.resolution_cache.get(normalized).await {
            return Ok(cached);
        }

        let resolved = if is_handle(normalized) {
            self.resolve_handle(normalized).await?
        } else if let Some(url) = self.platform_url(normalized) {
            self.resolve_url(&url).await?
        } else {
            return Err(ResolveError::InvalidIdentifier(normalized.to_string()));
        };

        self.resolution_cache
            .insert(normalized.to_string(), resolved.clone())
            .await;

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::Router;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const ID: &str = "UCabcdefghijklmnopqrAQgw";

    /// Serve canned pages on an ephemeral port; returns the base URL and a hit counter
    async fn serve_pages(pages: Vec<(&'static str, String)>) -> (String, Arc<AtomicUsize>) {
        let pages: Arc<HashMap<&'static str, String>> = Arc::new(pages.into_iter().collect());
        let hits = Arc::new(AtomicUsize::new(0));

        let app = Router::new().fallback({
            let pages = pages.clone();
            let hits = hits.clone();
            move |uri: Uri| {
                let pages = pages.clone();
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if uri.path() == "/@Slow" {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    match pages.get(uri.path()) {
                        Some(body) => (StatusCode::OK, body.clone()).into_response(),
                        None => StatusCode::NOT_FOUND.into_response(),
                    }
                }
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), hits)
    }

    fn resolver_for(base_url: &str) -> HttpChannelResolver {
        HttpChannelResolver::with_config(ResolverConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(500),
            ..ResolverConfig::default()
        })
        .unwrap()
    }

    fn capped_resolver_for(base_url: &str, max_page_bytes: usize) -> HttpChannelResolver {
        HttpChannelResolver::with_config(ResolverConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_millis(500),
            max_page_bytes,
            ..ResolverConfig::default()
        })
        .unwrap()
    }

    fn channel_page() -> String {
        format!(r#"<html><script>{{"channelId":"{ID}","title":"Some"}}</script></html>"#)
    }

    #[tokio::test]
    async fn test_canonical_returns_without_fetch() {
        let (base, hits) = serve_pages(vec![]).await;
        let resolver = resolver_for(&base);

        let resolved = resolver.resolve(ID).await.unwrap();
        assert_eq!(resolved.id.as_str(), ID);
        assert!(resolved.display_name.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handle_resolves_and_names() {
        let (base, _) = serve_pages(vec![("/@SomeHandle", channel_page())]).await;
        let resolver = resolver_for(&base);

        let resolved = resolver.resolve("@SomeHandle").await.unwrap();
        assert_eq!(resolved.id.as_str(), ID);
        assert_eq!(resolved.display_name.as_deref(), Some("@SomeHandle"));
    }

    #[tokio::test]
    async fn test_handle_resolution_is_cached() {
        let (base, hits) = serve_pages(vec![("/@SomeHandle", channel_page())]).await;
        let resolver = resolver_for(&base);

        let first = resolver.resolve("@SomeHandle").await.unwrap();
        let second = resolver.resolve("@SomeHandle").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handle_falls_back_to_canonical_link() {
        let page = r#"<link rel="canonical" href="https://www.youtube.com/channel/UClinklinklinklinklinkA">"#;
        let (base, _) = serve_pages(vec![("/@Linked", page.to_string())]).await;
        let resolver = resolver_for(&base);

        let resolved = resolver.resolve("@Linked").await.unwrap();
        assert_eq!(resolved.id.as_str(), "UClinklinklinklinklinkA");
    }

    #[tokio::test]
    async fn test_handle_without_pattern_fails() {
        let (base, _) = serve_pages(vec![("/@Empty", "<html></html>".to_string())]).await;
        let resolver = resolver_for(&base);

        let err = resolver.resolve("@Empty").await.unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (base, hits) = serve_pages(vec![]).await;
        let resolver = resolver_for(&base);

        assert!(resolver.resolve("@Missing").await.is_err());
        assert!(resolver.resolve("@Missing").await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_status_fails() {
        let (base, _) = serve_pages(vec![]).await;
        let resolver = resolver_for(&base);

        let err = resolver.resolve("@Missing").await.unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_url_resolves_without_name() {
        let (base, _) = serve_pages(vec![("/c/SomeChannel", channel_page())]).await;
        let resolver = resolver_for(&base);

        let resolved = resolver
            .resolve(&format!("{base}/c/SomeChannel"))
            .await
            .unwrap();
        assert_eq!(resolved.id.as_str(), ID);
        assert!(resolved.display_name.is_none());
    }

    #[tokio::test]
    async fn test_foreign_host_is_invalid() {
        let (base, hits) = serve_pages(vec![]).await;
        let resolver = resolver_for(&base);

        let err = resolver
            .resolve("https://example.com/channel/whatever")
            .await
            .unwrap_err();
        assert!(err.is_invalid_identifier());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unrecognised_shape_is_invalid() {
        let resolver = resolver_for("http://127.0.0.1:1");
        let err = resolver.resolve("somechannel").await.unwrap_err();
        assert!(err.is_invalid_identifier());
    }

    #[tokio::test]
    async fn test_timeout_fails() {
        let (base, _) = serve_pages(vec![("/@Slow", channel_page())]).await;
        let resolver = resolver_for(&base);

        let err = resolver.resolve("@Slow").await.unwrap_err();
        assert!(matches!(err, ResolveError::Http(_)));
    }

    #[tokio::test]
    async fn test_page_is_read_up_to_limit() {
        let head_first = format!("{}{}", channel_page(), " ".repeat(64 * 1024));
        let (base, _) = serve_pages(vec![("/@Big", head_first)]).await;
        let resolver = capped_resolver_for(&base, 1024);

        let resolved = resolver.resolve("@Big").await.unwrap();
        assert_eq!(resolved.id.as_str(), ID);
    }

    #[tokio::test]
    async fn test_id_beyond_limit_is_not_found() {
        let buried = format!("{}{}", " ".repeat(64 * 1024), channel_page());
        let (base, _) = serve_pages(vec![("/@Buried", buried)]).await;
        let resolver = capped_resolver_for(&base, 1024);

        let err = resolver.resolve("@Buried").await.unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed(_)));
    }
}
