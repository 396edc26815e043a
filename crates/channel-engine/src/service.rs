use std::collections::HashSet;
use std::sync::Arc;

use channel_db::{channels, Channel, SqlitePool, VerificationStatus, VoteDirection};
use channel_id::normalize;
use channel_resolver::{ChannelResolver, Resolved};
use tracing::{debug, info};

use crate::cache::StalenessCache;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::rate_limit::RateLimiter;

/// The aggregation API: get, vote and verify over resolved channel identities.
///
/// Constructed once at startup and shared by every request handler; the
/// cache and limiter state live exactly as long as this value.
pub struct ChannelService {
    pool: SqlitePool,
    resolver: Arc<dyn ChannelResolver>,
    cache: StalenessCache,
    limits: RateLimiter,
    admins: HashSet<String>,
}

impl ChannelService {
    pub fn new(pool: SqlitePool, resolver: Arc<dyn ChannelResolver>, config: EngineConfig) -> Self {
        Self {
            pool,
            resolver,
            cache: StalenessCache::new(config.cache_ttl, config.cache_max_capacity),
            limits: RateLimiter::new(config.global_limit, config.vote_limit),
            admins: config.admin_ids.into_iter().collect(),
        }
    }

    /// Spend one point of the actor's global budget
    pub fn check_request(&self, actor: &str) -> Result<()> {
        self.limits.check_global(actor)
    }

    pub fn is_admin(&self, identity: &str) -> bool {
        self.admins.contains(identity)
    }

    /// Approximate number of cached channel records
    pub fn cached_channels(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Fetch the aggregate record for any accepted identifier form
    pub async fn get_channel(&self, actor: &str, raw_id: &str) -> Result<Channel> {
        self.limits.check_global(actor)?;

        let Resolved { id, display_name } = self.resolve(raw_id).await?;

        if let Some(cached) = self.cache.get(&id).await {
            return Ok(cached);
        }

        let generation = self.cache.generation(&id);
        let fetched = channels::get_or_create(&self.pool, &id).await?;
        let mut channel = fetched.channel;
        if fetched.created {
            info!(channel_id = %id, "New channel record");
        }

        if let Some(name) = display_name {
            if channel.has_default_name()
                && channels::maybe_set_name(&self.pool, &id, &name).await?
            {
                debug!(channel_id = %id, name = %name, "Backfilled channel name");
                channel.name = name;
            }
        }

        if !self.cache.put(id.clone(), channel.clone(), generation).await {
            debug!(channel_id = %id, "Skipped caching record invalidated during read");
        }
        Ok(channel)
    }

    /// Record one crowd vote from `actor`
    pub async fn vote(&self, actor: &str, raw_id: &str, direction: VoteDirection) -> Result<()> {
        self.limits.check_global(actor)?;

        let Resolved { id, .. } = self.resolve(raw_id).await?;

        self.limits.check_vote(actor, &id)?;

        channels::increment_vote(&self.pool, &id, direction).await?;
        self.cache.invalidate(&id).await;

        info!(channel_id = %id, direction = ?direction, "Recorded vote");
        Ok(())
    }

    /// Set the admin verification status.
    ///
    /// `acting_identity` is the pre-authenticated caller, `None` when the
    /// request carried no valid credentials.
    pub async fn verify(
        &self,
        actor: &str,
        raw_id: &str,
        status: VerificationStatus,
        acting_identity: Option<&str>,
    ) -> Result<()> {
        self.limits.check_global(actor)?;

        let identity = acting_identity.ok_or(EngineError::Unauthorized)?;
        if !self.is_admin(identity) {
            return Err(EngineError::Forbidden);
        }

        let Resolved { id, .. } = self.resolve(raw_id).await?;

        channels::set_verification(&self.pool, &id, status).await?;
        self.cache.invalidate(&id).await;

        info!(channel_id = %id, status = ?status, admin = %identity, "Set verification status");
        Ok(())
    }

    /// Normalize and resolve a raw identifier to a canonical one
    async fn resolve(&self, raw_id: &str) -> Result<Resolved> {
        let normalized = normalize(raw_id);
        debug!(raw = %raw_id, normalized = %normalized, "Normalized channel identifier");

        let resolved = self.resolver.resolve(&normalized).await?;

        debug!(normalized = %normalized, channel_id = %resolved.id, "Resolved channel identifier");
        Ok(resolved)
    }
}
