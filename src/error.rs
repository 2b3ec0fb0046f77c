// =============================================================================
// Error taxonomy
// =============================================================================
//
// Two error families with different recovery policies:
//
//   AnalysisError — produced by the computation core. `InsufficientData` is
//   recoverable per indicator (the aggregator records a skipped entry);
//   `InvalidSeries` and `Configuration` abort the whole analysis.
//
//   FeedError — produced by the data-acquisition collaborator only. The core
//   never retries; retry policy belongs to the caller of the feed client.
// =============================================================================

use thiserror::Error;

/// Errors produced by the technical-analysis core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The series is shorter than the indicator's minimum window. Recoverable:
    /// the aggregator skips the indicator and continues.
    #[error("{indicator}: insufficient data (need {required} points, have {actual})")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// The series cannot be normalized into a usable form. Aborts the request.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// Caller-supplied parameters are unusable. Fails fast before computation.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Errors produced by the upstream market-data feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("feed transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
