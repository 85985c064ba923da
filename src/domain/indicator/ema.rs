//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are undefined.

use crate::domain::error::TiercastError;
use crate::domain::indicator::check_period;

pub fn calculate_ema(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, TiercastError> {
    check_period("period", period, closes.len())?;

    let mut values = Vec::with_capacity(closes.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        if i < period - 1 {
            sum += close;
            values.push(None);
        } else if i == period - 1 {
            sum += close;
            ema = sum / period as f64;
            values.push(Some(ema));
        } else {
            ema = close * k + ema * (1.0 - k);
            values.push(Some(ema));
        }
    }

    Ok(values)
}
