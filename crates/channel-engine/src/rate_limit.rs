//! Fixed-window rate limiting
//!
//! Each key holds a `(count, window_start)` pair that is checked and reset
//! on access. Windows reset fully once their duration has elapsed; this is
//! not a sliding window, so a burst straddling a boundary can reach twice
//! the budget.

use channel_id::ChannelId;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{EngineError, RateLimitScope};

/// Budget of `points` per fixed `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub points: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(points: u32, window: Duration) -> Self {
        Self { points, window }
    }
}

/// Rejection from a limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitExceeded {
    /// Time until the current window resets
    pub retry_after: Duration,
}

#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

struct Windows<K> {
    by_key: HashMap<K, Window>,
    next_prune: Instant,
}

pub struct FixedWindowLimiter<K> {
    policy: RateLimitPolicy,
    windows: Mutex<Windows<K>>,
}

impl<K: Hash + Eq + Clone> FixedWindowLimiter<K> {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(Windows {
                by_key: HashMap::new(),
                next_prune: Instant::now() + policy.window,
            }),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Spend one point for `key`
    pub fn consume(&self, key: &K) -> Result<(), RateLimitExceeded> {
        self.consume_at(key, Instant::now())
    }

    pub fn consume_at(&self, key: &K, now: Instant) -> Result<(), RateLimitExceeded> {
        let window_len = self.policy.window;
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Drop windows that ended, at most once per window length
        if now >= windows.next_prune {
            windows
                .by_key
                .retain(|_, w| now.saturating_duration_since(w.started_at) < window_len);
            windows.next_prune = now + window_len;
        }

        let window = windows.by_key.entry(key.clone()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        let elapsed = now.saturating_duration_since(window.started_at);
        if elapsed >= window_len {
            window.count = 0;
            window.started_at = now;
        }

        if window.count >= self.policy.points {
            let elapsed = now.saturating_duration_since(window.started_at);
            return Err(RateLimitExceeded {
                retry_after: window_len.saturating_sub(elapsed),
            });
        }

        window.count += 1;
        Ok(())
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .by_key
            .len()
    }
}

/// The two independent policies the engine enforces
pub struct RateLimiter {
    global: FixedWindowLimiter<String>,
    votes: FixedWindowLimiter<(String, ChannelId)>,
}

impl RateLimiter {
    pub fn new(global: RateLimitPolicy, vote: RateLimitPolicy) -> Self {
        Self {
            global: FixedWindowLimiter::new(global),
            votes: FixedWindowLimiter::new(vote),
        }
    }

    /// Per-actor request budget, checked on every request
    pub fn check_global(&self, actor: &str) -> Result<(), EngineError> {
        self.global
            .consume(&actor.to_string())
            .map_err(|e| EngineError::RateLimited {
                scope: RateLimitScope::Global,
                retry_after: e.retry_after,
            })
    }

    /// Per-(actor, channel) vote cooldown
    pub fn check_vote(&self, actor: &str, id: &ChannelId) -> Result<(), EngineError> {
        self.votes
            .consume(&(actor.to_string(), id.clone()))
            .map_err(|e| EngineError::RateLimited {
                scope: RateLimitScope::Vote,
                retry_after: e.retry_after,
            })
    }
}
