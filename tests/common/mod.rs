#![allow(dead_code)]

use bandtrader::domain::bar::Bar;
use bandtrader::domain::error::BandtraderError;
use bandtrader::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Bar>, BandtraderError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(BandtraderError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(code).cloned().unwrap_or_default();
        bars.retain(|b| {
            start_date.is_none_or(|start| b.date >= start)
                && end_date.is_none_or(|end| b.date <= end)
        });
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, BandtraderError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }

    fn data_range(
        &self,
        code: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BandtraderError> {
        let bars = self.fetch_bars(code, None, None)?;
        Ok(bars
            .first()
            .zip(bars.last())
            .map(|(first, last)| (first.date, last.date, bars.len())))
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Daily bars starting at 2024-01-01, one per price.
pub fn make_bars(prices: &[f64]) -> Vec<Bar> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: date(2024, 1, 1)
                .checked_add_days(chrono::Days::new(i as u64))
                .unwrap(),
            close,
        })
        .collect()
}

/// A gently jittered series around `base`: positive stddev, mean close to
/// `base`, never near the band edges on its own.
pub fn jittered(base: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| base + if i % 2 == 0 { 0.5 } else { -0.5 })
        .collect()
}
