//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) values are undefined.

use crate::domain::error::TiercastError;
use crate::domain::indicator::check_period;

pub fn calculate_sma(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, TiercastError> {
    check_period("period", period, closes.len())?;

    let warmup = period - 1;
    let values = (0..closes.len())
        .map(|i| {
            if i < warmup {
                None
            } else {
                let window = &closes[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect();

    Ok(values)
}
