//! Technical indicator engine.
//!
//! Every calculator takes closing prices ordered by date and returns output
//! channels index-aligned with the input. `None` marks an index without
//! enough history. Calculators are pure functions; none of them read outside
//! the slice they are handed.
//!
//! - `IndicatorKind`: the closed set of supported indicators
//! - `IndicatorParams`: typed parameters per indicator, resolved from a
//!   loose key/value bag
//! - `ChannelValues`: one named output sequence

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use crate::domain::error::TiercastError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bollinger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Bollinger => "bollinger",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = TiercastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            "rsi" => Ok(IndicatorKind::Rsi),
            "macd" => Ok(IndicatorKind::Macd),
            "bollinger" | "bollinger_bands" => Ok(IndicatorKind::Bollinger),
            other => Err(TiercastError::invalid_parameter(
                "indicator",
                format!("unsupported indicator '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorParams {
    Sma {
        period: usize,
    },
    Ema {
        period: usize,
    },
    Rsi {
        period: usize,
    },
    Macd {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },
    Bollinger {
        period: usize,
        std_dev: f64,
    },
}

/// One named, index-aligned output sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelValues {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

impl ChannelValues {
    pub fn new(name: &'static str, values: Vec<Option<f64>>) -> Self {
        Self { name, values }
    }
}

impl IndicatorParams {
    /// Resolve a loose parameter bag into typed parameters, applying defaults
    /// for missing keys. Unknown keys are rejected.
    pub fn from_bag(
        kind: IndicatorKind,
        bag: &HashMap<String, f64>,
    ) -> Result<Self, TiercastError> {
        let params = match kind {
            IndicatorKind::Sma | IndicatorKind::Ema => {
                reject_unknown(bag, &["period", "window"])?;
                let period = match bag.get("window") {
                    Some(&v) => as_period("window", v)?,
                    None => period_or(bag, "period", DEFAULT_PERIOD)?,
                };
                if kind == IndicatorKind::Sma {
                    IndicatorParams::Sma { period }
                } else {
                    IndicatorParams::Ema { period }
                }
            }
            IndicatorKind::Rsi => {
                reject_unknown(bag, &["period"])?;
                IndicatorParams::Rsi {
                    period: period_or(bag, "period", DEFAULT_PERIOD)?,
                }
            }
            IndicatorKind::Macd => {
                reject_unknown(bag, &["fast_period", "slow_period", "signal_period"])?;
                IndicatorParams::Macd {
                    fast_period: period_or(bag, "fast_period", macd::DEFAULT_FAST)?,
                    slow_period: period_or(bag, "slow_period", macd::DEFAULT_SLOW)?,
                    signal_period: period_or(bag, "signal_period", macd::DEFAULT_SIGNAL)?,
                }
            }
            IndicatorKind::Bollinger => {
                reject_unknown(bag, &["period", "std_dev", "multiplier"])?;
                let std_dev = bag
                    .get("std_dev")
                    .or_else(|| bag.get("multiplier"))
                    .copied()
                    .unwrap_or(DEFAULT_BOLLINGER_MULTIPLIER);
                IndicatorParams::Bollinger {
                    period: period_or(bag, "period", DEFAULT_BOLLINGER_PERIOD)?,
                    std_dev,
                }
            }
        };
        params.validate()?;
        Ok(params)
    }

    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorParams::Sma { .. } => IndicatorKind::Sma,
            IndicatorParams::Ema { .. } => IndicatorKind::Ema,
            IndicatorParams::Rsi { .. } => IndicatorKind::Rsi,
            IndicatorParams::Macd { .. } => IndicatorKind::Macd,
            IndicatorParams::Bollinger { .. } => IndicatorKind::Bollinger,
        }
    }

    /// Checks that do not depend on the data: non-zero periods, fast < slow,
    /// positive multiplier. Length checks happen in the calculators.
    pub fn validate(&self) -> Result<(), TiercastError> {
        match *self {
            IndicatorParams::Sma { period }
            | IndicatorParams::Ema { period }
            | IndicatorParams::Rsi { period } => check_nonzero("period", period),
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => {
                check_nonzero("fast_period", fast_period)?;
                check_nonzero("slow_period", slow_period)?;
                check_nonzero("signal_period", signal_period)?;
                macd::check_fast_slow(fast_period, slow_period)
            }
            IndicatorParams::Bollinger { period, std_dev } => {
                check_nonzero("period", period)?;
                bollinger::check_multiplier(std_dev)
            }
        }
    }

    /// Run the calculator for these parameters over `closes`.
    pub fn compute(&self, closes: &[f64]) -> Result<Vec<ChannelValues>, TiercastError> {
        match *self {
            IndicatorParams::Sma { period } => Ok(vec![ChannelValues::new(
                "sma",
                calculate_sma(closes, period)?,
            )]),
            IndicatorParams::Ema { period } => Ok(vec![ChannelValues::new(
                "ema",
                calculate_ema(closes, period)?,
            )]),
            IndicatorParams::Rsi { period } => Ok(vec![ChannelValues::new(
                "rsi",
                calculate_rsi(closes, period)?,
            )]),
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => {
                let out = calculate_macd(closes, fast_period, slow_period, signal_period)?;
                Ok(vec![
                    ChannelValues::new("macd", out.macd),
                    ChannelValues::new("signal", out.signal),
                    ChannelValues::new("histogram", out.histogram),
                ])
            }
            IndicatorParams::Bollinger { period, std_dev } => {
                let out = calculate_bollinger(closes, period, std_dev)?;
                Ok(vec![
                    ChannelValues::new("upper", out.upper),
                    ChannelValues::new("middle", out.middle),
                    ChannelValues::new("lower", out.lower),
                ])
            }
        }
    }
}

impl fmt::Display for IndicatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorParams::Sma { period } => write!(f, "SMA({})", period),
            IndicatorParams::Ema { period } => write!(f, "EMA({})", period),
            IndicatorParams::Rsi { period } => write!(f, "RSI({})", period),
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => write!(f, "MACD({},{},{})", fast_period, slow_period, signal_period),
            IndicatorParams::Bollinger { period, std_dev } => {
                write!(f, "BOLLINGER({},{})", period, std_dev)
            }
        }
    }
}

/// Shared window check: `1 <= period <= len`.
pub(crate) fn check_period(name: &str, period: usize, len: usize) -> Result<(), TiercastError> {
    check_nonzero(name, period)?;
    if period > len {
        return Err(TiercastError::invalid_parameter(
            name,
            format!("{} exceeds the {} available bars", period, len),
        ));
    }
    Ok(())
}

fn check_nonzero(name: &str, period: usize) -> Result<(), TiercastError> {
    if period == 0 {
        return Err(TiercastError::invalid_parameter(name, "must be at least 1"));
    }
    Ok(())
}

fn as_period(name: &str, value: f64) -> Result<usize, TiercastError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(TiercastError::invalid_parameter(
            name,
            format!("expected a whole number, got {}", value),
        ));
    }
    if value < 1.0 {
        return Err(TiercastError::invalid_parameter(name, "must be at least 1"));
    }
    Ok(value as usize)
}

fn period_or(
    bag: &HashMap<String, f64>,
    name: &str,
    default: usize,
) -> Result<usize, TiercastError> {
    match bag.get(name) {
        Some(&v) => as_period(name, v),
        None => Ok(default),
    }
}

fn reject_unknown(bag: &HashMap<String, f64>, allowed: &[&str]) -> Result<(), TiercastError> {
    let mut unknown: Vec<&str> = bag
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    unknown.sort_unstable();
    match unknown.first() {
        Some(key) => Err(TiercastError::invalid_parameter(
            *key,
            format!("unknown parameter, expected one of: {}", allowed.join(", ")),
        )),
        None => Ok(()),
    }
}
