// =============================================================================
// Shared types used across the Borsa analytics service
// =============================================================================

use serde::{Deserialize, Serialize};

/// Categorical trading signal attached to a single indicator reading; also
/// the type of the aggregated overall bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl Signal {
    /// Vote weight used by the aggregator's majority vote: BUY and SELL
    /// count +/-1, NEUTRAL abstains.
    pub fn vote(self) -> i32 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
            Self::Neutral => 0,
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}
