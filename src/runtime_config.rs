// =============================================================================
// Runtime Configuration
// =============================================================================
//
// All tunables for the service live here: the upstream feed URL, default
// indicator parameters, signal thresholds, and the optional keep-alive
// pinger. Loaded from a JSON file at startup; every field carries
// `#[serde(default)]` so adding new fields never breaks loading an older
// config file.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::IndicatorParams;
use crate::signals::SignalThresholds;

fn default_feed_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_keepalive_interval_secs() -> u64 {
    600
}

/// Service configuration. Immutable after startup; per-request indicator
/// overrides are layered on top of `indicators` by the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base URL of the market-data upstream (no trailing slash).
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Default indicator windows/periods for analysis requests.
    #[serde(default)]
    pub indicators: IndicatorParams,

    /// Signal-rule cut-offs (RSI overbought/oversold).
    #[serde(default)]
    pub thresholds: SignalThresholds,

    /// URL the keep-alive task pings. The task is not started when unset.
    #[serde(default)]
    pub keepalive_url: Option<String>,

    /// Seconds between keep-alive pings.
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
            keepalive_url: None,
            keepalive_interval_secs: default_keepalive_interval_secs(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file, rejecting unusable indicator
    /// parameters up front so a bad config fails at startup rather than on
    /// the first request.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        config
            .indicators
            .validate()
            .context("config contains invalid indicator parameters")?;

        info!(path = %path.display(), "runtime config loaded");
        Ok(config)
    }

    /// Save configuration atomically (write tmp file, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");

        let contents =
            serde_json::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(&tmp, contents)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to rename {} into place", tmp.display()))?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_loads_with_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.feed_url, default_feed_url());
        assert_eq!(config.indicators.rsi_window, 14);
        assert_eq!(config.thresholds.rsi_overbought, 70.0);
        assert!(config.keepalive_url.is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: RuntimeConfig = serde_json::from_str(
            r#"{"indicators": {"rsi_window": 21}, "keepalive_url": "http://example.org/ping"}"#,
        )
        .unwrap();
        assert_eq!(config.indicators.rsi_window, 21);
        assert_eq!(config.indicators.macd_slow, 26);
        assert_eq!(
            config.keepalive_url.as_deref(),
            Some("http://example.org/ping")
        );
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("borsa_config.json");

        let mut config = RuntimeConfig::default();
        config.indicators.rsi_window = 21;
        config.keepalive_url = Some("http://example.org/ping".to_string());
        config.save(&path).unwrap();

        // The tmp file from the atomic write must not linger.
        assert!(!path.with_extension("tmp").exists());

        let back = RuntimeConfig::load(&path).unwrap();
        assert_eq!(back.indicators.rsi_window, 21);
        assert_eq!(back.keepalive_url.as_deref(), Some("http://example.org/ping"));
    }

    #[test]
    fn roundtrips_through_json() {
        let config = RuntimeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.feed_url, config.feed_url);
        assert_eq!(back.indicators.sma_window, config.indicators.sma_window);
    }
}
