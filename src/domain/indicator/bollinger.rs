//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are undefined.

use crate::domain::error::TiercastError;
use crate::domain::indicator::{calculate_sma, calculate_stddev};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub(crate) fn check_multiplier(multiplier: f64) -> Result<(), TiercastError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(TiercastError::invalid_parameter(
            "std_dev",
            format!("multiplier must be a positive number, got {}", multiplier),
        ));
    }
    Ok(())
}

pub fn calculate_bollinger(
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerOutput, TiercastError> {
    check_multiplier(multiplier)?;

    let middle = calculate_sma(closes, period)?;
    let stddev = calculate_stddev(closes, period)?;

    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());
    for (m, sd) in middle.iter().zip(stddev.iter()) {
        match (m, sd) {
            (Some(m), Some(sd)) => {
                upper.push(Some(m + multiplier * sd));
                lower.push(Some(m - multiplier * sd));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    Ok(BollingerOutput {
        upper,
        middle,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;

    #[test]
    fn bollinger_warmup() {
        let out = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0).unwrap();

        for band in [&out.upper, &out.middle, &out.lower] {
            assert!(band[0].is_none());
            assert!(band[1].is_none());
            assert!(band[2].is_some());
            assert!(band[4].is_some());
        }
    }

    #[test]
    fn bollinger_constant_values() {
        let out = calculate_bollinger(&[100.0; 5], 3, 2.0).unwrap();

        assert!((out.middle[2].unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((out.upper[2].unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((out.lower[2].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let out = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0).unwrap();

        let expected_middle: f64 = (10.0 + 20.0 + 30.0) / 3.0;
        let variance: f64 = ((10.0 - expected_middle).powi(2)
            + (20.0 - expected_middle).powi(2)
            + (30.0 - expected_middle).powi(2))
            / 3.0;
        let stddev = variance.sqrt();

        assert!((out.middle[2].unwrap() - expected_middle).abs() < 1e-10);
        assert!((out.upper[2].unwrap() - (expected_middle + 2.0 * stddev)).abs() < 1e-10);
        assert!((out.lower[2].unwrap() - (expected_middle - 2.0 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let narrow = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 1.0).unwrap();
        let wide = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.5).unwrap();

        let stddev = (200.0_f64 / 3.0).sqrt();
        assert!((narrow.upper[2].unwrap() - (20.0 + stddev)).abs() < 1e-10);
        assert!((wide.upper[2].unwrap() - (20.0 + 2.5 * stddev)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let out = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0).unwrap();

        let upper_dist = out.upper[2].unwrap() - out.middle[2].unwrap();
        let lower_dist = out.middle[2].unwrap() - out.lower[2].unwrap();
        assert!((upper_dist - lower_dist).abs() < 1e-10);
    }

    #[test]
    fn bollinger_non_positive_multiplier() {
        for k in [0.0, -1.0, f64::INFINITY] {
            let err = calculate_bollinger(&[10.0, 20.0, 30.0], 3, k).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidParameter);
        }
    }
}
