// =============================================================================
// Keep-alive self-ping task
// =============================================================================
//
// Free-tier hosting platforms idle out services that receive no traffic;
// this task pings a configured URL on a fixed interval to keep the process
// warm. It holds no reference to any analysis state and is started (or not)
// independently of the core: dropping the spawned task is the only
// lifecycle it has.
// =============================================================================

use std::time::Duration;

use tracing::{debug, info, warn};

/// Ping `url` every `interval_secs` seconds, forever. Failures are logged
/// and the loop continues; there is nothing to recover beyond the next tick.
pub async fn run_keepalive(url: String, interval_secs: u64) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "keep-alive disabled: failed to build HTTP client");
            return;
        }
    };

    let interval_secs = interval_secs.max(1);
    info!(url = %url, interval_secs, "keep-alive task started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so startup traffic stays
    // quiet.
    interval.tick().await;

    loop {
        interval.tick().await;
        match client.get(&url).send().await {
            Ok(resp) => {
                debug!(status = %resp.status(), "keep-alive ping");
            }
            Err(e) => {
                warn!(error = %e, "keep-alive ping failed");
            }
        }
    }
}
