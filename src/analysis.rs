// =============================================================================
// Analysis Aggregator
// =============================================================================
//
// Runs the full pipeline for one symbol: normalize the raw series once, run
// every indicator with its configured parameters, derive a signal per
// indicator, and fold the signals into a single overall bias by majority
// vote (BUY = +1, SELL = -1, NEUTRAL = 0).
//
// An indicator that cannot be computed because the series is too short is
// recorded as a skipped entry, not a failure; the report only fails when the
// series itself is unusable or every indicator had to be skipped.
//
// The report is a plain immutable value. Timestamps are derived from the
// input series (the date of its last point), never from the wall clock, so
// the same input always produces the identical report.
// =============================================================================

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisError;
use crate::indicators::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
};
use crate::series::{RawPricePoint, Series};
use crate::signals::{
    derive_signal, IndicatorResult, IndicatorValue, SignalContext, SignalThresholds,
    SignalVerdict,
};
use crate::types::Signal;

// =============================================================================
// Parameters
// =============================================================================

fn default_sma_window() -> usize {
    50
}
fn default_ema_window() -> usize {
    20
}
fn default_rsi_window() -> usize {
    14
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}
fn default_bb_window() -> usize {
    20
}
fn default_bb_std() -> f64 {
    2.0
}

/// Window/period parameters for one analysis run. Callers may override any
/// field; the defaults are the conventional ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
    #[serde(default = "default_ema_window")]
    pub ema_window: usize,
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    #[serde(default = "default_bb_window")]
    pub bb_window: usize,
    #[serde(default = "default_bb_std")]
    pub bb_std: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_window: default_sma_window(),
            ema_window: default_ema_window(),
            rsi_window: default_rsi_window(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_window: default_bb_window(),
            bb_std: default_bb_std(),
        }
    }
}

impl IndicatorParams {
    /// Fail fast on parameters no series length could satisfy. Length
    /// checks are the indicators' job; this catches caller mistakes before
    /// any computation runs.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.sma_window == 0 || self.ema_window == 0 || self.rsi_window == 0 {
            return Err(AnalysisError::Configuration(
                "indicator windows must be positive".to_string(),
            ));
        }
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return Err(AnalysisError::Configuration(
                "MACD windows must be positive".to_string(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(AnalysisError::Configuration(format!(
                "MACD fast window ({}) must be smaller than slow window ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.bb_window < 2 {
            return Err(AnalysisError::Configuration(
                "Bollinger window must be at least 2".to_string(),
            ));
        }
        if !self.bb_std.is_finite() || self.bb_std < 0.0 {
            return Err(AnalysisError::Configuration(
                "Bollinger standard-deviation multiplier must be finite and non-negative"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// The smallest series length that would let at least one indicator run.
    fn min_requirement(&self) -> usize {
        [
            self.sma_window,
            self.ema_window,
            self.rsi_window + 1,
            self.macd_slow + self.macd_signal,
            self.bb_window,
        ]
        .into_iter()
        .min()
        .expect("array is non-empty")
    }
}

// =============================================================================
// Report types
// =============================================================================

/// One computed indicator together with its derived signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorEntry {
    #[serde(flatten)]
    pub result: IndicatorResult,
    #[serde(flatten)]
    pub verdict: SignalVerdict,
}

/// An indicator that could not be computed on this series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedIndicator {
    pub name: String,
    pub reason: String,
}

/// The complete analysis for one symbol. Built per request, serialized by
/// the API layer, then dropped; there is no cross-request state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub as_of: DateTime<Utc>,
    pub last_close: f64,
    pub indicators: Vec<IndicatorEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedIndicator>,
    pub overall_bias: Signal,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Analyze a raw series for `symbol` with the given parameters.
///
/// # Errors
/// - `Configuration` when the parameters are unusable.
/// - `InvalidSeries` / `InsufficientData` when normalization fails.
/// - `InsufficientData` when every indicator had to be skipped.
pub fn analyze(
    symbol: &str,
    raw: Vec<RawPricePoint>,
    params: &IndicatorParams,
    thresholds: &SignalThresholds,
) -> Result<AnalysisReport, AnalysisError> {
    params.validate()?;

    let series = Series::normalize(raw)?;
    let closes = series.closes();
    let last = series.last();

    // Derived from the series, not the wall clock: identical input must
    // produce an identical report.
    let as_of = last.date.and_time(NaiveTime::MIN).and_utc();
    let ctx = SignalContext {
        last_close: last.close,
    };

    let computed: Vec<(String, Result<IndicatorValue, AnalysisError>)> = vec![
        (
            format!("SMA_{}", params.sma_window),
            calculate_sma(&closes, params.sma_window).map(IndicatorValue::MovingAverage),
        ),
        (
            format!("EMA_{}", params.ema_window),
            calculate_ema(&closes, params.ema_window)
                .map(|s| IndicatorValue::MovingAverage(*s.last().expect("EMA output is non-empty"))),
        ),
        (
            format!("RSI_{}", params.rsi_window),
            calculate_rsi(&closes, params.rsi_window).map(IndicatorValue::Oscillator),
        ),
        (
            format!(
                "MACD_{}_{}_{}",
                params.macd_fast, params.macd_slow, params.macd_signal
            ),
            calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal).map(
                |out| IndicatorValue::Macd {
                    macd: out.macd,
                    signal: out.signal,
                    histogram: out.histogram,
                    prev_histogram: out.prev_histogram,
                },
            ),
        ),
        (
            format!("BB_{}", params.bb_window),
            calculate_bollinger(&closes, params.bb_window, params.bb_std).map(|out| {
                IndicatorValue::Bands {
                    upper: out.upper,
                    middle: out.middle,
                    lower: out.lower,
                }
            }),
        ),
    ];

    let mut indicators = Vec::with_capacity(computed.len());
    let mut skipped = Vec::new();
    let mut vote = 0i32;

    for (name, outcome) in computed {
        match outcome {
            Ok(value) => {
                let result = IndicatorResult {
                    name,
                    value,
                    computed_at: as_of,
                };
                let verdict = derive_signal(&result, &ctx, thresholds);
                vote += verdict.signal.vote();
                indicators.push(IndicatorEntry { result, verdict });
            }
            Err(err @ AnalysisError::InsufficientData { .. }) => {
                debug!(symbol, indicator = %name, "indicator skipped: {err}");
                skipped.push(SkippedIndicator {
                    name,
                    reason: err.to_string(),
                });
            }
            // Parameter problems are caught by validate(); anything else
            // here is a real failure and aborts the report.
            Err(err) => return Err(err),
        }
    }

    if indicators.is_empty() {
        return Err(AnalysisError::InsufficientData {
            indicator: "analysis",
            required: params.min_requirement(),
            actual: series.len(),
        });
    }

    let overall_bias = match vote {
        v if v > 0 => Signal::Buy,
        v if v < 0 => Signal::Sell,
        _ => Signal::Neutral,
    };

    debug!(
        symbol,
        computed = indicators.len(),
        skipped = skipped.len(),
        bias = %overall_bias,
        "analysis complete"
    );

    Ok(AnalysisReport {
        symbol: symbol.to_string(),
        as_of,
        last_close: last.close,
        indicators,
        skipped,
        overall_bias,
    })
}
