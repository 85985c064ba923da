//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the defined part of the MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: MACD line from slow - 1, signal and histogram from
//! slow - 1 + signal - 1.

use crate::domain::error::TiercastError;
use crate::domain::indicator::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub(crate) fn check_fast_slow(fast: usize, slow: usize) -> Result<(), TiercastError> {
    if fast >= slow {
        return Err(TiercastError::invalid_parameter(
            "fast_period",
            format!("fast period {} must be below slow period {}", fast, slow),
        ));
    }
    Ok(())
}

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdOutput, TiercastError> {
    check_fast_slow(fast, slow)?;
    if signal_period == 0 {
        return Err(TiercastError::invalid_parameter(
            "signal_period",
            "must be at least 1",
        ));
    }

    let ema_fast = calculate_ema(closes, fast)?;
    let ema_slow = calculate_ema(closes, slow)?;

    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let macd_warmup = slow - 1;
    let defined: Vec<f64> = macd[macd_warmup..].iter().flatten().copied().collect();
    if signal_period > defined.len() {
        return Err(TiercastError::invalid_parameter(
            "signal_period",
            format!(
                "{} exceeds the {} defined MACD values",
                signal_period,
                defined.len()
            ),
        ));
    }

    let mut signal = vec![None; macd_warmup];
    signal.extend(calculate_ema(&defined, signal_period)?);

    let histogram = macd
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    Ok(MacdOutput {
        macd,
        signal,
        histogram,
    })
}
