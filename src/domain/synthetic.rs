//! Deterministic synthetic dataset, used when no dataset file exists.
//!
//! Each symbol follows a seeded random walk over the weekdays of a fixed
//! window ending yesterday. The same seed and the same `today` always yield
//! the same bars.

use crate::domain::ohlcv::PriceBar;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DAYS: u32 = 1095;

/// Symbols and their starting prices.
pub const SYMBOLS: [(&str, f64); 10] = [
    ("AAPL", 150.0),
    ("GOOGL", 2800.0),
    ("MSFT", 330.0),
    ("TSLA", 200.0),
    ("AMZN", 3300.0),
    ("META", 350.0),
    ("NVDA", 250.0),
    ("JPM", 140.0),
    ("JNJ", 160.0),
    ("V", 220.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub days: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            days: DEFAULT_DAYS,
        }
    }
}

/// Weekdays in `[today - days, today - 1]`.
pub fn trading_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let Some(start) = today.checked_sub_days(Days::new(u64::from(days))) else {
        return Vec::new();
    };
    start
        .iter_days()
        .take_while(|d| *d < today)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

pub fn generate(today: NaiveDate, config: SyntheticConfig) -> Vec<PriceBar> {
    let dates = trading_days(today, config.days);
    let mut bars = Vec::with_capacity(dates.len() * SYMBOLS.len());

    for (index, (symbol, base_price)) in SYMBOLS.iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(symbol_seed(config.seed, index));
        let mut prev_close = *base_price;

        for (i, &date) in dates.iter().enumerate() {
            let open = if i == 0 {
                *base_price
            } else {
                let trend = rng.gen_range(-0.002..0.003);
                let volatility = rng.gen_range(-0.05..0.05);
                (prev_close * (1.0 + trend + volatility)).max(1.0)
            };

            let daily_vol: f64 = rng.gen_range(0.01..0.04);
            let close_change = rng.gen_range(-daily_vol / 2.0..daily_vol / 2.0);
            let close = (open * (1.0 + close_change)).max(1.0);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..daily_vol));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..daily_vol));

            let base_volume = rng.gen_range(500_000u64..=5_000_000);
            let volume_multiplier = rng.gen_range(0.5..2.0);
            let volume = (base_volume as f64 * volume_multiplier) as u64;

            let open = round_cents(open);
            let close = round_cents(close);
            let bar = PriceBar {
                symbol: symbol.to_string(),
                date,
                open,
                high: round_cents(high).max(open.max(close)),
                low: round_cents(low).min(open.min(close)),
                close,
                volume,
            };
            prev_close = bar.close;
            bars.push(bar);
        }
    }

    bars
}

fn symbol_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // a Monday
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn trading_days_skip_weekends_and_today() {
        let days = trading_days(today(), 7);
        // 2025-06-23 (Mon) ..= 2025-06-29 (Sun) → five weekdays
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
        assert_eq!(days[4], NaiveDate::from_ymd_opt(2025, 6, 27).unwrap());
        assert!(!days.contains(&today()));
    }

    #[test]
    fn generate_is_deterministic() {
        let config = SyntheticConfig { seed: 7, days: 60 };
        assert_eq!(generate(today(), config), generate(today(), config));
    }

    #[test]
    fn different_seed_changes_data() {
        let a = generate(today(), SyntheticConfig { seed: 1, days: 60 });
        let b = generate(today(), SyntheticConfig { seed: 2, days: 60 });
        assert_ne!(a, b);
    }

    #[test]
    fn every_symbol_covers_every_day() {
        let config = SyntheticConfig { seed: 42, days: 30 };
        let bars = generate(today(), config);
        let days = trading_days(today(), 30);
        assert_eq!(bars.len(), days.len() * SYMBOLS.len());

        for (symbol, base) in SYMBOLS {
            let series: Vec<_> = bars.iter().filter(|b| b.symbol == symbol).collect();
            assert_eq!(series.len(), days.len());
            assert!((series[0].open - base).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn bars_satisfy_load_invariants() {
        let bars = generate(today(), SyntheticConfig::default());
        for bar in &bars {
            assert!(bar.check().is_ok(), "{:?}", bar);
            assert!(bar.high >= bar.open && bar.high >= bar.close);
            assert!(bar.low <= bar.open && bar.low <= bar.close);
            assert!((500_000 / 2..=10_000_000).contains(&bar.volume));
        }
    }
}
