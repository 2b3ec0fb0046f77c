// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators exposed by the
// analysis pipeline. Every function validates its parameters first (a bad
// window is a `Configuration` error) and then its input length (a short
// series is `InsufficientData`), so callers can tell a caller mistake from
// a thin series and skip the latter.
//
// All arithmetic is f64; no rounding happens here. Display formatting is a
// boundary concern.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{calculate_bollinger, BollingerOutput};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdOutput};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
