// =============================================================================
// Signal Engine — per-indicator categorical signals
// =============================================================================
//
// Maps one indicator reading into a BUY / SELL / NEUTRAL verdict with a
// human-readable rationale. Every rule is deterministic, reads nothing but
// its own indicator (plus the latest close for the trend and band rules),
// and tie-breaks toward NEUTRAL.
//
// Thresholds are configuration, not constants: the conventional RSI 70/30
// defaults live in `SignalThresholds` and can be overridden per deployment.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Signal;

/// The numeric payload of one indicator computation. The variant decides
/// which signal rule applies, so SMA/EMA (trend rule) and RSI (bounded
/// oscillator rule) are distinct even though both are scalars on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    /// SMA or EMA level, compared against the latest close.
    MovingAverage(f64),
    /// Bounded oscillator in [0, 100] (RSI), compared against thresholds.
    Oscillator(f64),
    /// MACD line / signal line / histogram, plus the previous histogram
    /// point when the series was long enough to produce one.
    Macd {
        macd: f64,
        signal: f64,
        histogram: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        prev_histogram: Option<f64>,
    },
    /// Bollinger bands, compared against the latest close.
    Bands { upper: f64, middle: f64, lower: f64 },
}

/// One indicator computation: name, value(s), and when it was computed.
/// Immutable; produced once per analysis, never cached across requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    pub name: String,
    pub value: IndicatorValue,
    pub computed_at: DateTime<Utc>,
}

/// A derived signal tied to one [`IndicatorResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalVerdict {
    pub signal: Signal,
    pub rationale: String,
}

/// Inputs the rules need beyond the indicator value itself.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext {
    /// Close price of the most recent point in the analyzed series.
    pub last_close: f64,
}

/// Tunable cut-offs for the threshold-based rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalThresholds {
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_overbought: default_rsi_overbought(),
            rsi_oversold: default_rsi_oversold(),
        }
    }
}

/// Derive the categorical signal for a single indicator result.
pub fn derive_signal(
    result: &IndicatorResult,
    ctx: &SignalContext,
    thresholds: &SignalThresholds,
) -> SignalVerdict {
    match &result.value {
        IndicatorValue::Oscillator(value) => oscillator_rule(*value, thresholds),
        IndicatorValue::MovingAverage(level) => trend_rule(&result.name, *level, ctx.last_close),
        IndicatorValue::Macd {
            histogram,
            prev_histogram,
            ..
        } => macd_rule(*histogram, *prev_histogram),
        IndicatorValue::Bands { upper, lower, .. } => band_rule(*upper, *lower, ctx.last_close),
    }
}

/// RSI: value >= overbought => SELL, value <= oversold => BUY.
fn oscillator_rule(value: f64, thresholds: &SignalThresholds) -> SignalVerdict {
    if value >= thresholds.rsi_overbought {
        SignalVerdict {
            signal: Signal::Sell,
            rationale: format!(
                "RSI {value:.2} at or above {:.1} (overbought)",
                thresholds.rsi_overbought
            ),
        }
    } else if value <= thresholds.rsi_oversold {
        SignalVerdict {
            signal: Signal::Buy,
            rationale: format!(
                "RSI {value:.2} at or below {:.1} (oversold)",
                thresholds.rsi_oversold
            ),
        }
    } else {
        SignalVerdict {
            signal: Signal::Neutral,
            rationale: format!("RSI {value:.2} inside the neutral band"),
        }
    }
}

/// SMA/EMA: close above the average => BUY bias, below => SELL bias.
fn trend_rule(name: &str, level: f64, close: f64) -> SignalVerdict {
    if close > level {
        SignalVerdict {
            signal: Signal::Buy,
            rationale: format!("close {close:.4} above {name} {level:.4}"),
        }
    } else if close < level {
        SignalVerdict {
            signal: Signal::Sell,
            rationale: format!("close {close:.4} below {name} {level:.4}"),
        }
    } else {
        SignalVerdict {
            signal: Signal::Neutral,
            rationale: format!("close equals {name} {level:.4}"),
        }
    }
}

/// MACD: histogram sign flip between the last two points.
fn macd_rule(histogram: f64, prev_histogram: Option<f64>) -> SignalVerdict {
    let Some(prev) = prev_histogram else {
        // Degraded but valid: one histogram point is not a crossover.
        return SignalVerdict {
            signal: Signal::Neutral,
            rationale: "insufficient history for crossover".to_string(),
        };
    };

    if prev < 0.0 && histogram > 0.0 {
        SignalVerdict {
            signal: Signal::Buy,
            rationale: format!("histogram crossed up ({prev:.4} -> {histogram:.4})"),
        }
    } else if prev > 0.0 && histogram < 0.0 {
        SignalVerdict {
            signal: Signal::Sell,
            rationale: format!("histogram crossed down ({prev:.4} -> {histogram:.4})"),
        }
    } else {
        SignalVerdict {
            signal: Signal::Neutral,
            rationale: format!("no histogram crossover ({prev:.4} -> {histogram:.4})"),
        }
    }
}

/// Bollinger: close at or beyond a band is an overextension.
fn band_rule(upper: f64, lower: f64, close: f64) -> SignalVerdict {
    if close >= upper {
        SignalVerdict {
            signal: Signal::Sell,
            rationale: format!("close {close:.4} at or above upper band {upper:.4}"),
        }
    } else if close <= lower {
        SignalVerdict {
            signal: Signal::Buy,
            rationale: format!("close {close:.4} at or below lower band {lower:.4}"),
        }
    } else {
        SignalVerdict {
            signal: Signal::Neutral,
            rationale: format!("close {close:.4} inside the bands"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, value: IndicatorValue) -> IndicatorResult {
        IndicatorResult {
            name: name.to_string(),
            value,
            computed_at: Utc::now(),
        }
    }

    fn derive(value: IndicatorValue, last_close: f64) -> SignalVerdict {
        derive_signal(
            &result("test", value),
            &SignalContext { last_close },
            &SignalThresholds::default(),
        )
    }

    // ---- RSI rule --------------------------------------------------------

    #[test]
    fn rsi_overbought_sells() {
        let v = derive(IndicatorValue::Oscillator(75.0), 100.0);
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn rsi_exactly_70_sells() {
        let v = derive(IndicatorValue::Oscillator(70.0), 100.0);
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn rsi_oversold_buys() {
        let v = derive(IndicatorValue::Oscillator(25.0), 100.0);
        assert_eq!(v.signal, Signal::Buy);
    }

    #[test]
    fn rsi_middle_is_neutral() {
        let v = derive(IndicatorValue::Oscillator(50.0), 100.0);
        assert_eq!(v.signal, Signal::Neutral);
    }

    #[test]
    fn rsi_custom_thresholds() {
        let thresholds = SignalThresholds {
            rsi_overbought: 80.0,
            rsi_oversold: 20.0,
        };
        let v = derive_signal(
            &result("RSI", IndicatorValue::Oscillator(75.0)),
            &SignalContext { last_close: 100.0 },
            &thresholds,
        );
        // 75 is overbought with the default 70 cut but not with 80.
        assert_eq!(v.signal, Signal::Neutral);
    }

    // ---- Trend rule ------------------------------------------------------

    #[test]
    fn close_above_average_buys() {
        let v = derive(IndicatorValue::MovingAverage(95.0), 100.0);
        assert_eq!(v.signal, Signal::Buy);
    }

    #[test]
    fn close_below_average_sells() {
        let v = derive(IndicatorValue::MovingAverage(105.0), 100.0);
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn close_equal_to_average_is_neutral() {
        let v = derive(IndicatorValue::MovingAverage(100.0), 100.0);
        assert_eq!(v.signal, Signal::Neutral);
    }

    // ---- MACD rule -------------------------------------------------------

    #[test]
    fn macd_bullish_crossover_buys() {
        let v = derive(
            IndicatorValue::Macd {
                macd: 1.0,
                signal: 0.5,
                histogram: 0.5,
                prev_histogram: Some(-0.2),
            },
            100.0,
        );
        assert_eq!(v.signal, Signal::Buy);
    }

    #[test]
    fn macd_bearish_crossover_sells() {
        let v = derive(
            IndicatorValue::Macd {
                macd: -1.0,
                signal: -0.5,
                histogram: -0.5,
                prev_histogram: Some(0.3),
            },
            100.0,
        );
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn macd_same_sign_is_neutral() {
        let v = derive(
            IndicatorValue::Macd {
                macd: 1.0,
                signal: 0.5,
                histogram: 0.5,
                prev_histogram: Some(0.2),
            },
            100.0,
        );
        assert_eq!(v.signal, Signal::Neutral);
    }

    #[test]
    fn macd_without_history_degrades_to_neutral() {
        let v = derive(
            IndicatorValue::Macd {
                macd: 1.0,
                signal: 0.5,
                histogram: 0.5,
                prev_histogram: None,
            },
            100.0,
        );
        assert_eq!(v.signal, Signal::Neutral);
        assert_eq!(v.rationale, "insufficient history for crossover");
    }

    // ---- Bollinger rule --------------------------------------------------

    #[test]
    fn close_at_upper_band_sells() {
        let v = derive(
            IndicatorValue::Bands {
                upper: 100.0,
                middle: 95.0,
                lower: 90.0,
            },
            100.0,
        );
        assert_eq!(v.signal, Signal::Sell);
    }

    #[test]
    fn close_at_lower_band_buys() {
        let v = derive(
            IndicatorValue::Bands {
                upper: 100.0,
                middle: 95.0,
                lower: 90.0,
            },
            90.0,
        );
        assert_eq!(v.signal, Signal::Buy);
    }

    #[test]
    fn close_inside_bands_is_neutral() {
        let v = derive(
            IndicatorValue::Bands {
                upper: 100.0,
                middle: 95.0,
                lower: 90.0,
            },
            95.0,
        );
        assert_eq!(v.signal, Signal::Neutral);
    }
}
