//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - Seed at index n: simple mean of the gains/losses of changes 1..=n
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are 0 (flat run): RSI = 50
//!
//! Warmup: indices 0..=n are undefined; the seed only primes the smoothing,
//! so the first reported value is at n + 1. A slice of exactly n + 1 bars
//! yields no defined value; fewer bars is an error.

use crate::domain::error::TiercastError;

/// Value reported when both average gain and average loss are zero.
pub const FLAT_RSI: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, TiercastError> {
    if period == 0 {
        return Err(TiercastError::invalid_parameter("period", "must be at least 1"));
    }
    if closes.len() <= period {
        return Err(TiercastError::invalid_parameter(
            "period",
            format!(
                "RSI({}) needs at least {} bars, got {}",
                period,
                period + 1,
                closes.len()
            ),
        ));
    }
    // enough bars to seed the averages but none left to report
    if closes.len() == period + 1 {
        return Ok(vec![None; closes.len()]);
    }

    // gains[j] / losses[j] describe the change into closes[j + 1]
    let mut gains: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = vec![None; period + 1];

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for j in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[j]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[j]) / period as f64;
        values.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    Ok(values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { 100.0 } else { FLAT_RSI }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
