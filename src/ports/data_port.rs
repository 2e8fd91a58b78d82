//! Market-data access port trait.
//!
//! The data source owns gap handling and ordering of the raw series; the
//! engine only re-validates what it receives.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use chrono::NaiveDate;

pub trait DataPort {
    /// Fetch the daily closing-price series for `code`, clamped to the
    /// optional date range, ordered by date.
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BandtraderError>;

    fn list_codes(&self) -> Result<Vec<String>, BandtraderError>;

    /// (first date, last date, bar count) for `code`, or `None` when the
    /// code has no data.
    fn data_range(&self, code: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError>;
}
