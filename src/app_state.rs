// =============================================================================
// Application State
// =============================================================================
//
// Shared across request handlers via `Arc<AppState>`. Everything here is
// immutable after startup: the analysis core is stateless, so concurrent
// requests need no locking of any kind.
// =============================================================================

use std::time::Instant;

use crate::feed::FeedClient;
use crate::runtime_config::RuntimeConfig;

/// Immutable service state shared by all HTTP handlers.
pub struct AppState {
    pub config: RuntimeConfig,
    pub feed: FeedClient,
    /// Instant when the service started. Used for uptime in health checks.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        let feed = FeedClient::new(config.feed_url.clone());
        Self {
            config,
            feed,
            start_time: Instant::now(),
        }
    }
}
