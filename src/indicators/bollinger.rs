// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(window); upper/lower = middle +/- num_std * sigma, where
// sigma is the trailing *sample* standard deviation (n - 1 divisor) over the
// same window. The sample divisor is why the window must be at least 2.
// =============================================================================

use crate::error::AnalysisError;
use crate::indicators::sma::calculate_sma;

/// The three bands of a Bollinger calculation at the latest point.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands over the last `window` closes.
///
/// # Errors
/// - `Configuration` when `window < 2` or `num_std` is not finite and
///   non-negative.
/// - `InsufficientData` when fewer than `window` closes are available.
pub fn calculate_bollinger(
    closes: &[f64],
    window: usize,
    num_std: f64,
) -> Result<BollingerOutput, AnalysisError> {
    if window < 2 {
        return Err(AnalysisError::Configuration(
            "Bollinger window must be at least 2 for a sample deviation".to_string(),
        ));
    }
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(AnalysisError::Configuration(format!(
            "Bollinger standard-deviation multiplier must be finite and non-negative, got {num_std}"
        )));
    }
    if closes.len() < window {
        return Err(AnalysisError::InsufficientData {
            indicator: "Bollinger",
            required: window,
            actual: closes.len(),
        });
    }

    let middle = calculate_sma(closes, window)?;

    let tail = &closes[closes.len() - window..];
    let variance =
        tail.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / (window as f64 - 1.0);
    let std_dev = variance.sqrt();

    Ok(BollingerOutput {
        upper: middle + num_std * std_dev,
        middle,
        lower: middle - num_std * std_dev,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_window_one_is_configuration_error() {
        let err = calculate_bollinger(&[1.0, 2.0], 1, 2.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn bollinger_negative_multiplier_is_configuration_error() {
        let err = calculate_bollinger(&[1.0, 2.0, 3.0], 2, -1.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn bollinger_short_series_is_insufficient() {
        let err = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { required: 20, actual: 3, .. }
        ));
    }

    #[test]
    fn bollinger_middle_equals_sma() {
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + (i as f64 * 0.9).cos() * 3.0).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        let sma = calculate_sma(&closes, 20).unwrap();
        assert_eq!(bb.middle, sma); // same formula, same inputs, bit-identical
    }

    #[test]
    fn bollinger_bands_bracket_the_middle() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
    }

    #[test]
    fn bollinger_flat_series_collapses_bands() {
        let closes = vec![100.0; 20];
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!((bb.upper - 100.0).abs() < 1e-12);
        assert!((bb.lower - 100.0).abs() < 1e-12);
    }

    #[test]
    fn bollinger_known_sample_deviation() {
        // Window [2, 4, 6]: mean 4, sample variance ((4+0+4)/2) = 4, sigma 2.
        let bb = calculate_bollinger(&[2.0, 4.0, 6.0], 3, 2.0).unwrap();
        assert!((bb.middle - 4.0).abs() < 1e-12);
        assert!((bb.upper - 8.0).abs() < 1e-12);
        assert!((bb.lower - 0.0).abs() < 1e-12);
    }
}
