//! Subscription tiers: historical depth and indicator access.

use crate::domain::error::TiercastError;
use crate::domain::indicator::IndicatorKind;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Premium,
}

/// How far back from today a tier may query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    Days(u32),
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSpec {
    pub tier: Tier,
    pub max_lookback: Lookback,
    pub permitted_indicators: Vec<IndicatorKind>,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Pro, Tier::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Premium => "premium",
        }
    }

    pub fn max_lookback(self) -> Lookback {
        match self {
            Tier::Free => Lookback::Days(90),
            Tier::Pro => Lookback::Days(365),
            Tier::Premium => Lookback::Unbounded,
        }
    }

    pub fn is_permitted(self, indicator: IndicatorKind) -> bool {
        match self {
            Tier::Free => matches!(indicator, IndicatorKind::Sma | IndicatorKind::Ema),
            Tier::Pro => matches!(
                indicator,
                IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Rsi | IndicatorKind::Macd
            ),
            Tier::Premium => true,
        }
    }

    pub fn spec(self) -> TierSpec {
        TierSpec {
            tier: self,
            max_lookback: self.max_lookback(),
            permitted_indicators: IndicatorKind::ALL
                .into_iter()
                .filter(|k| self.is_permitted(*k))
                .collect(),
        }
    }

    /// `today - max_lookback`, or `None` when the tier is unbounded.
    pub fn earliest_allowed(self, today: NaiveDate) -> Option<NaiveDate> {
        match self.max_lookback() {
            Lookback::Days(days) => Some(
                today
                    .checked_sub_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MIN),
            ),
            Lookback::Unbounded => None,
        }
    }

    pub fn check_permitted(self, indicator: IndicatorKind) -> Result<(), TiercastError> {
        if self.is_permitted(indicator) {
            Ok(())
        } else {
            Err(TiercastError::IndicatorNotPermitted {
                indicator: indicator.to_string(),
                tier: self.to_string(),
            })
        }
    }

    /// Reject a range whose start lies before the tier's visibility window.
    /// The range is never truncated; on success it is returned unchanged.
    pub fn clamp_range(
        self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), TiercastError> {
        if let Some(earliest) = self.earliest_allowed(today) {
            if start < earliest {
                return Err(TiercastError::DateRangeRestricted {
                    tier: self.to_string(),
                    start,
                    earliest,
                });
            }
        }
        Ok((start, end))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = TiercastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            "premium" => Ok(Tier::Premium),
            other => Err(TiercastError::invalid_parameter(
                "tier",
                format!("invalid subscription tier '{}'", other),
            )),
        }
    }
}
