//! Channel Identity Resolution & Aggregation Engine
//!
//! [`ChannelService`] is the single entry point: it normalizes and resolves
//! raw identifiers, serves records through a short-lived cache, enforces
//! the per-actor and per-vote rate limits, and applies votes and admin
//! verification to the record store.

pub mod cache;
mod config;
pub mod error;
pub mod rate_limit;
mod service;

pub use cache::StalenessCache;
pub use config::EngineConfig;
pub use error::{EngineError, RateLimitScope, Result};
pub use rate_limit::{FixedWindowLimiter, RateLimitExceeded, RateLimitPolicy, RateLimiter};
pub use service::ChannelService;

pub use channel_db::{Channel, VerificationStatus, VoteDirection};
