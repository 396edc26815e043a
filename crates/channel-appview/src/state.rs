use channel_engine::ChannelService;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::auth::TokenVerifier;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChannelService>,
    /// `None` when no signing secret is configured; every token is then rejected
    pub tokens: Option<Arc<TokenVerifier>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: ChannelService, tokens: Option<TokenVerifier>) -> Self {
        Self {
            service: Arc::new(service),
            tokens: tokens.map(Arc::new),
            started_at: Utc::now(),
        }
    }
}
