//! CSV file data adapter.
//!
//! Reads `<CODE>.csv` files of `date,close` rows from a base directory.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn read_all(&self, code: &str) -> Result<Vec<Bar>, BandtraderError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BandtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| BandtraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BandtraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| BandtraderError::Data {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| BandtraderError::Data {
                    reason: format!("invalid close value: {}", e),
                })?;

            bars.push(Bar { date, close });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BandtraderError> {
        let mut bars = self.read_all(code)?;
        bars.retain(|b| {
            start_date.is_none_or(|start| b.date >= start)
                && end_date.is_none_or(|end| b.date <= end)
        });
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, BandtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read directory {}: {}", self.base_path.display(), e),
        })?;

        let mut codes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BandtraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(code) = name_str.strip_suffix(".csv") {
                codes.push(code.to_string());
            }
        }

        codes.sort();
        Ok(codes)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError> {
        let bars = self.read_all(code)?;
        Ok(bars
            .first()
            .zip(bars.last())
            .map(|(first, last)| (first.date, last.date, bars.len())))
    }
}
