//! Rolling standard deviation.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) values are undefined.

use crate::domain::error::TiercastError;
use crate::domain::indicator::check_period;

pub fn calculate_stddev(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, TiercastError> {
    check_period("period", period, closes.len())?;

    let warmup = period - 1;
    let values = (0..closes.len())
        .map(|i| {
            if i < warmup {
                return None;
            }
            let window = &closes[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            Some(variance.sqrt())
        })
        .collect();

    Ok(values)
}
