// =============================================================================
// Price series — normalization boundary for upstream OHLCV data
// =============================================================================
//
// Upstream providers return loosely-shaped rows: unordered, with duplicate
// dates, missing fields, and the occasional NaN. Everything downstream of
// this module assumes a clean series, so normalization is the single place
// where raw rows are validated.
//
// Invariants established by `Series::normalize`:
//   - dates strictly increasing, no duplicates (latest-received row wins)
//   - every close finite and non-negative
//   - optional fields either absent or finite and non-negative
//   - length >= 1
//
// Gap policy: missing trading days are NOT interpolated. An indicator over
// "N periods" means N available points, not N calendar days.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A raw OHLCV row as received from an upstream provider. Every numeric
/// field is optional because sparse sources (funds, FX fixings) often carry
/// only a close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPricePoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// A validated OHLCV point. `close` is always finite and non-negative; the
/// optional fields are either `None` or finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// A normalized, chronologically ordered price series. Can only be built
/// through [`Series::normalize`], so holding a `Series` is proof that the
/// invariants above hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    points: Vec<PricePoint>,
}

/// Drop a value that is non-finite or negative (volume may be zero).
fn sanitize(field: Option<f64>) -> Option<f64> {
    field.filter(|v| v.is_finite() && *v >= 0.0)
}

impl Series {
    /// Normalize a raw provider sequence into a `Series`.
    ///
    /// Rows without a usable close (missing, non-finite, or negative) are
    /// dropped. Remaining rows are sorted by date; among rows sharing a date
    /// the latest-received one wins. Pure: the input is consumed, nothing
    /// else is touched.
    ///
    /// # Errors
    /// - `InsufficientData` when the raw input is empty or every row lacked
    ///   a close field entirely.
    /// - `InvalidSeries` when rows carried close values but none were finite
    ///   and non-negative.
    pub fn normalize(raw: Vec<RawPricePoint>) -> Result<Self, AnalysisError> {
        if raw.is_empty() {
            return Err(AnalysisError::InsufficientData {
                indicator: "series",
                required: 1,
                actual: 0,
            });
        }

        let had_close_field = raw.iter().any(|r| r.close.is_some());

        let mut points: Vec<PricePoint> = raw
            .into_iter()
            .filter_map(|r| {
                let close = sanitize(r.close)?;
                Some(PricePoint {
                    date: r.date,
                    open: sanitize(r.open),
                    high: sanitize(r.high),
                    low: sanitize(r.low),
                    close,
                    volume: sanitize(r.volume),
                })
            })
            .collect();

        if points.is_empty() {
            if had_close_field {
                return Err(AnalysisError::InvalidSeries(
                    "no finite close values".to_string(),
                ));
            }
            return Err(AnalysisError::InsufficientData {
                indicator: "series",
                required: 1,
                actual: 0,
            });
        }

        // Stable sort keeps arrival order within a date, so for duplicate
        // dates the last element is the latest-received row.
        points.sort_by_key(|p| p.date);
        points.dedup_by(|next, prev| {
            if next.date == prev.date {
                // Keep the later arrival: overwrite the retained element.
                *prev = next.clone();
                true
            } else {
                false
            }
        });

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close prices in chronological (oldest-first) order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// The most recent point. Safe because length >= 1 is an invariant.
    pub fn last(&self) -> &PricePoint {
        self.points.last().expect("Series is never empty")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn raw(d: u32, close: f64) -> RawPricePoint {
        RawPricePoint {
            date: day(d),
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }

    #[test]
    fn normalize_sorts_chronologically() {
        let series =
            Series::normalize(vec![raw(3, 3.0), raw(1, 1.0), raw(2, 2.0)]).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn normalize_duplicate_dates_keeps_latest_received() {
        let series =
            Series::normalize(vec![raw(1, 10.0), raw(2, 20.0), raw(1, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![11.0, 20.0]);
    }

    #[test]
    fn normalize_empty_input_is_insufficient() {
        let err = Series::normalize(Vec::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn normalize_all_nan_closes_is_invalid_series() {
        let rows = vec![raw(1, f64::NAN), raw(2, f64::INFINITY)];
        let err = Series::normalize(rows).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSeries(_)));
    }

    #[test]
    fn normalize_missing_closes_is_insufficient() {
        let rows = vec![RawPricePoint {
            date: day(1),
            open: Some(1.0),
            high: None,
            low: None,
            close: None,
            volume: None,
        }];
        let err = Series::normalize(rows).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn normalize_drops_rows_without_usable_close() {
        let series =
            Series::normalize(vec![raw(1, 5.0), raw(2, f64::NAN), raw(3, -1.0), raw(4, 7.0)])
                .unwrap();
        assert_eq!(series.closes(), vec![5.0, 7.0]);
    }

    #[test]
    fn normalize_sanitizes_optional_fields() {
        let rows = vec![RawPricePoint {
            date: day(1),
            open: Some(f64::NAN),
            high: Some(-4.0),
            low: Some(1.0),
            close: Some(2.0),
            volume: Some(0.0),
        }];
        let series = Series::normalize(rows).unwrap();
        let p = series.last();
        assert_eq!(p.open, None);
        assert_eq!(p.high, None);
        assert_eq!(p.low, Some(1.0));
        assert_eq!(p.volume, Some(0.0)); // zero volume is valid
    }

    #[test]
    fn normalize_single_point_succeeds() {
        let series = Series::normalize(vec![raw(1, 42.0)]).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().close, 42.0);
    }
}
