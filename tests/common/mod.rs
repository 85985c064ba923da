#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::io::Write;
use tiercast::domain::error::TiercastError;
pub use tiercast::domain::ohlcv::PriceBar;
use tiercast::domain::store::TimeSeriesStore;
use tiercast::domain::synthetic::SyntheticConfig;
use tiercast::ports::data_port::DataPort;

/// In-memory data source: rows, an absent source, or a load failure.
pub struct MockDataPort {
    pub bars: Option<Vec<PriceBar>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn with_bars(bars: Vec<PriceBar>) -> Self {
        Self {
            bars: Some(bars),
            error: None,
        }
    }

    pub fn absent() -> Self {
        Self {
            bars: None,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: None,
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_bars(&self) -> Result<Option<Vec<PriceBar>>, TiercastError> {
        if let Some(reason) = &self.error {
            return Err(TiercastError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Fixed reference day for tier windows.
pub fn today() -> NaiveDate {
    date("2025-06-30")
}

pub fn make_bar(symbol: &str, date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: date(date_str),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting at `start`, closes taken from `closes`.
pub fn make_series(symbol: &str, start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let first = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            symbol: symbol.to_string(),
            date: first + Days::new(i as u64),
            open: close,
            high: close + 1.0,
            low: (close - 1.0).max(0.01),
            close,
            volume: 1000,
        })
        .collect()
}

pub fn loaded_store(bars: Vec<PriceBar>) -> TimeSeriesStore {
    let store = TimeSeriesStore::new();
    store
        .load(
            &MockDataPort::with_bars(bars),
            SyntheticConfig::default(),
            today(),
        )
        .unwrap();
    store
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
