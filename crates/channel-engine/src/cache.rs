//! Read-through cache of channel records with a fixed time-to-live
//!
//! Entries are served only while younger than the TTL; an expired entry is
//! reported as a miss even if it has not been evicted yet. Every write
//! through the service invalidates the affected entry.
//!
//! Invalidation bumps a generation counter for the key's stripe. A reader
//! takes the generation before reading the record store and passes it to
//! [`StalenessCache::put`]; if an invalidation landed in between, the
//! freshly inserted copy is dropped again instead of being served stale.

use channel_db::Channel;
use channel_id::ChannelId;
use moka::future::Cache;
use std::hash::{BuildHasher, RandomState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const GENERATION_STRIPES: usize = 64;

pub struct StalenessCache {
    entries: Cache<ChannelId, Channel>,
    generations: Box<[AtomicU64]>,
    hasher: RandomState,
}

impl StalenessCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self {
            entries,
            generations: (0..GENERATION_STRIPES).map(|_| AtomicU64::new(0)).collect(),
            hasher: RandomState::new(),
        }
    }

    pub async fn get(&self, id: &ChannelId) -> Option<Channel> {
        self.entries.get(id).await
    }

    /// Current invalidation generation for `id`; take it before reading the record store
    pub fn generation(&self, id: &ChannelId) -> u64 {
        self.stripe(id).load(Ordering::SeqCst)
    }

    /// Insert or overwrite, restarting the entry's TTL.
    ///
    /// Returns `false` (and leaves no entry) when `id` was invalidated after
    /// `generation` was taken.
    pub async fn put(&self, id: ChannelId, channel: Channel, generation: u64) -> bool {
        let stripe = self.stripe(&id);
        self.entries.insert(id.clone(), channel).await;
        if stripe.load(Ordering::SeqCst) != generation {
            self.entries.invalidate(&id).await;
            return false;
        }
        true
    }

    pub async fn invalidate(&self, id: &ChannelId) {
        self.stripe(id).fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate(id).await;
    }

    /// Approximate number of resident entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    fn stripe(&self, id: &ChannelId) -> &AtomicU64 {
        let index = self.hasher.hash_one(id) as usize % self.generations.len();
        &self.generations[index]
    }
}
