// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first
//          `window` gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (window - 1) + current_gain) / window
//            avg_loss = (prev_avg_loss * (window - 1) + current_loss) / window
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When the average loss is zero (only gains in the window) RSI is 100 by
// definition; the division-by-zero case never reaches the RS formula.
// =============================================================================

use crate::error::AnalysisError;

/// Compute the current RSI over the trailing `window` period deltas.
///
/// The result is always in [0, 100].
///
/// # Errors
/// - `Configuration` when `window == 0`.
/// - `InsufficientData` when fewer than `window + 1` closes are available
///   (`window` deltas need one extra point).
pub fn calculate_rsi(closes: &[f64], window: usize) -> Result<f64, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::Configuration(
            "RSI window must be positive".to_string(),
        ));
    }
    if closes.len() < window + 1 {
        return Err(AnalysisError::InsufficientData {
            indicator: "RSI",
            required: window + 1,
            actual: closes.len(),
        });
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed averages with the SMA of the first `window` deltas.
    let (sum_gain, sum_loss) = deltas[..window].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let window_f = window as f64;
    let mut avg_gain = sum_gain / window_f;
    let mut avg_loss = sum_loss / window_f;

    // Wilder's smoothing over the remaining deltas.
    for &delta in &deltas[window..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };
        avg_gain = (avg_gain * (window_f - 1.0) + gain) / window_f;
        avg_loss = (avg_loss * (window_f - 1.0) + loss) / window_f;
    }

    let rsi = if avg_loss == 0.0 {
        // Only gains (or no movement at all): fully overbought by definition.
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    Ok(rsi.clamp(0.0, 100.0))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_zero_window_is_configuration_error() {
        let err = calculate_rsi(&[1.0, 2.0, 3.0], 0).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn rsi_needs_window_plus_one_points() {
        // 14 closes => 13 deltas, one short of a 14-period RSI.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let err = calculate_rsi(&closes, 14).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { required: 15, actual: 14, .. }
        ));

        // One more point and it succeeds.
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_ok());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!((rsi - 100.0).abs() < 1e-10, "expected 100.0, got {rsi}");
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!(rsi.abs() < 1e-10, "expected 0.0, got {rsi}");
    }

    #[test]
    fn rsi_flat_market_is_100_by_zero_loss_rule() {
        // No movement at all: avg loss = 0, so the zero-loss rule applies.
        let closes = vec![100.0; 30];
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!((rsi - 100.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!((0.0..=100.0).contains(&rsi), "RSI {rsi} out of range");
    }

    #[test]
    fn rsi_mixed_series_between_extremes() {
        let closes = [10.0, 11.0, 10.5, 11.5, 11.0, 12.0, 11.5, 12.5, 12.0, 13.0, 12.5, 13.5, 13.0, 14.0, 13.5, 14.5];
        let rsi = calculate_rsi(&closes, 14).unwrap();
        assert!(rsi > 0.0 && rsi < 100.0);
    }
}
