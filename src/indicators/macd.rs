// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD line  = EMA(fast) - EMA(slow)
// Signal line = EMA(signal) of the MACD line series
// Histogram  = MACD line - signal line
//
// The two EMA series have different lengths (the slow EMA starts later), so
// the fast series is truncated to the slow series' tail before subtracting.
// A stable signal line needs `slow + signal` closes: that leaves the MACD
// line with at least `signal + 1` points, which in turn yields at least two
// histogram points so the crossover rule downstream has something to
// compare.
// =============================================================================

use crate::error::AnalysisError;
use crate::indicators::ema::calculate_ema;

/// The latest MACD reading plus the previous histogram point for crossover
/// detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// Histogram one step earlier, when the series was long enough to
    /// produce one. The crossover rule degrades to NEUTRAL without it.
    pub prev_histogram: Option<f64>,
}

/// Compute MACD over `closes` with the given EMA windows.
///
/// # Errors
/// - `Configuration` when any window is zero or `fast >= slow`.
/// - `InsufficientData` when fewer than `slow + signal` closes are
///   available.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdOutput, AnalysisError> {
    if fast == 0 || slow == 0 || signal == 0 {
        return Err(AnalysisError::Configuration(
            "MACD windows must be positive".to_string(),
        ));
    }
    if fast >= slow {
        return Err(AnalysisError::Configuration(format!(
            "MACD fast window ({fast}) must be smaller than slow window ({slow})"
        )));
    }

    let required = slow + signal;
    if closes.len() < required {
        return Err(AnalysisError::InsufficientData {
            indicator: "MACD",
            required,
            actual: closes.len(),
        });
    }

    let ema_fast = calculate_ema(closes, fast)?;
    let ema_slow = calculate_ema(closes, slow)?;

    // Align the fast series to the slow series' tail and subtract.
    let offset = ema_fast.len() - ema_slow.len();
    let macd_line: Vec<f64> = ema_fast[offset..]
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal)?;

    // Histogram over the stretch covered by the signal line.
    let tail = &macd_line[macd_line.len() - signal_line.len()..];
    let histogram: Vec<f64> = tail
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    let last = histogram.len() - 1;
    Ok(MacdOutput {
        macd: macd_line[macd_line.len() - 1],
        signal: signal_line[signal_line.len() - 1],
        histogram: histogram[last],
        prev_histogram: last.checked_sub(1).map(|i| histogram[i]),
    })
}
