//! Channel Identity Resolver
//!
//! Turns a normalized identifier (canonical ID, `@handle`, or platform
//! URL) into a canonical channel ID. Canonical input is returned as-is;
//! handles and URLs are fetched and scraped with the ordered extraction
//! strategies from `channel-id`. Successful resolutions are cached.

pub mod error;
mod resolver;
mod types;

pub use error::{ResolveError, Result};
pub use resolver::{ChannelResolver, HttpChannelResolver};
pub use types::{Resolved, ResolverConfig};
