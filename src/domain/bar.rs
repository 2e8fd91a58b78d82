//! Price bar representation and input-series validation.

use chrono::NaiveDate;

use super::error::BandtraderError;

/// One timestamped closing-price observation. Immutable once produced by
/// the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

/// Minimum number of bars the simulation driver can work with: index 0 is
/// the series' starting reference point, so at least one more bar is needed.
pub const MIN_BARS: usize = 2;

/// Reject invalid input before any simulation state is created.
///
/// A series is valid when it has at least [`MIN_BARS`] bars, dates are
/// strictly increasing, and every close is a positive finite number.
pub fn validate_series(bars: &[Bar]) -> Result<(), BandtraderError> {
    if bars.len() < MIN_BARS {
        return Err(BandtraderError::TooShortSeries {
            bars: bars.len(),
            minimum: MIN_BARS,
        });
    }

    for (i, bar) in bars.iter().enumerate() {
        if !(bar.close.is_finite() && bar.close > 0.0) {
            return Err(BandtraderError::NonPositivePrice {
                index: i,
                price: bar.close,
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(BandtraderError::NonIncreasingTimestamps { index: i });
        }
    }

    Ok(())
}
