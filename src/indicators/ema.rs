// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the SMA.
//
// Formula:
//   multiplier = 2 / (window + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `window`
// closes, so the output series has one value per close starting at index
// `window - 1`.
// =============================================================================

use crate::error::AnalysisError;

/// Compute the EMA series for the given closes and look-back `window`.
///
/// The returned vector is never empty on success; the last element is the
/// current EMA. The full tail is returned (rather than just the latest
/// value) because MACD consumes the whole series.
///
/// # Errors
/// - `Configuration` when `window == 0`.
/// - `InsufficientData` when fewer than `window` closes are available.
pub fn calculate_ema(closes: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Configuration(
            "EMA window must be positive".to_string(),
        ));
    }
    if closes.len() < window {
        return Err(AnalysisError::InsufficientData {
            indicator: "EMA",
            required: window,
            actual: closes.len(),
        });
    }

    let multiplier = 2.0 / (window as f64 + 1.0);

    // Seed: SMA of the first `window` closes.
    let seed: f64 = closes[..window].iter().sum::<f64>() / window as f64;

    let mut result = Vec::with_capacity(closes.len() - window + 1);
    result.push(seed);

    let mut prev = seed;
    for &close in &closes[window..] {
        let ema = close * multiplier + prev * (1.0 - multiplier);
        result.push(ema);
        prev = ema;
    }

    Ok(result)
}
