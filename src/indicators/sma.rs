// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the last `window` closes. The most basic trend filter:
// price above its SMA leans bullish, below leans bearish.
// =============================================================================

use crate::error::AnalysisError;

/// Compute the SMA of the last `window` closes.
///
/// # Errors
/// - `Configuration` when `window == 0`.
/// - `InsufficientData` when fewer than `window` closes are available.
pub fn calculate_sma(closes: &[f64], window: usize) -> Result<f64, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Configuration(
            "SMA window must be positive".to_string(),
        ));
    }
    if closes.len() < window {
        return Err(AnalysisError::InsufficientData {
            indicator: "SMA",
            required: window,
            actual: closes.len(),
        });
    }

    let tail = &closes[closes.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}
