//! Daily OHLCV bar and the per-symbol slice type.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Checks the per-bar load invariants: finite positive prices and
    /// `high >= low`.
    pub fn check(&self) -> Result<(), String> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "{} {}: {} must be a positive number, got {}",
                    self.symbol, self.date, name, value
                ));
            }
        }
        if self.high < self.low {
            return Err(format!(
                "{} {}: high {} below low {}",
                self.symbol, self.date, self.high, self.low
            ));
        }
        Ok(())
    }
}

/// Bars for one symbol, strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSlice {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl SeriesSlice {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn is_strictly_ordered(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].date < w[1].date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            symbol: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn valid_bar_passes_check() {
        assert!(sample_bar().check().is_ok());
    }

    #[test]
    fn non_positive_price_rejected() {
        let mut bar = sample_bar();
        bar.close = 0.0;
        let err = bar.check().unwrap_err();
        assert!(err.contains("close"));

        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.check().is_err());
    }

    #[test]
    fn inverted_high_low_rejected() {
        let mut bar = sample_bar();
        bar.high = 80.0;
        let err = bar.check().unwrap_err();
        assert!(err.contains("below low"));
    }

    #[test]
    fn slice_projections() {
        let mut second = sample_bar();
        second.date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        second.close = 107.5;
        let slice = SeriesSlice::new("AAPL", vec![sample_bar(), second]);

        assert_eq!(slice.len(), 2);
        assert_eq!(slice.closes(), vec![105.0, 107.5]);
        assert_eq!(
            slice.dates(),
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            ]
        );
        assert!(slice.is_strictly_ordered());
    }

    #[test]
    fn duplicate_dates_are_not_strictly_ordered() {
        let slice = SeriesSlice::new("AAPL", vec![sample_bar(), sample_bar()]);
        assert!(!slice.is_strictly_ordered());
    }
}
