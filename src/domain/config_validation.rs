//! Configuration validation and the resolved application settings.
//!
//! Every key is optional. Present keys are checked before use so a typo in
//! the INI file fails fast with a `ConfigInvalid` error instead of silently
//! falling back to a default.

use crate::domain::error::TiercastError;
use crate::domain::synthetic::{DEFAULT_DAYS, DEFAULT_SEED, SyntheticConfig};
use crate::ports::config_port::ConfigPort;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_PATH: &str = "data/ohlc.csv";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected text or json", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub synthetic: SyntheticConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            synthetic: SyntheticConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Validate `config` and resolve it, applying defaults for missing keys.
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, TiercastError> {
        validate_config(config)?;

        let seed = match config.get_string("synthetic", "seed") {
            Some(raw) => parse_seed(&raw)?,
            None => DEFAULT_SEED,
        };
        let days = config.get_int("synthetic", "days", i64::from(DEFAULT_DAYS));
        let log_format = match config.get_string("logging", "format") {
            Some(raw) => raw
                .parse()
                .map_err(|reason| invalid("logging", "format", reason))?,
            None => LogFormat::Text,
        };

        Ok(Self {
            data_path: config
                .get_string("data", "path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            synthetic: SyntheticConfig {
                seed,
                days: u32::try_from(days)
                    .map_err(|_| invalid("synthetic", "days", "days is out of range"))?,
            },
            log_level: config
                .get_string("logging", "level")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
        })
    }
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    validate_data_path(config)?;
    validate_seed(config)?;
    validate_days(config)?;
    validate_log_level(config)?;
    validate_log_format(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    if let Some(path) = config.get_string("data", "path") {
        if path.trim().is_empty() {
            return Err(invalid("data", "path", "path must not be empty"));
        }
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    if let Some(raw) = config.get_string("synthetic", "seed") {
        parse_seed(&raw)?;
    }
    Ok(())
}

/// Seeds span the whole `u64` range.
fn parse_seed(raw: &str) -> Result<u64, TiercastError> {
    let trimmed = raw.trim();
    trimmed.parse::<u64>().map_err(|_| {
        if trimmed.parse::<i128>().is_ok_and(|v| v < 0) {
            invalid("synthetic", "seed", "seed must be non-negative")
        } else {
            invalid("synthetic", "seed", format!("'{}' is not an integer", raw))
        }
    })
}

fn validate_days(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    if let Some(raw) = config.get_string("synthetic", "days") {
        let days: i64 = raw
            .trim()
            .parse()
            .map_err(|_| invalid("synthetic", "days", format!("'{}' is not an integer", raw)))?;
        if days <= 0 {
            return Err(invalid("synthetic", "days", "days must be positive"));
        }
        if days > i64::from(u32::MAX) {
            return Err(invalid("synthetic", "days", "days is out of range"));
        }
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    if let Some(level) = config.get_string("logging", "level") {
        if level.trim().is_empty() {
            return Err(invalid("logging", "level", "level must not be empty"));
        }
    }
    Ok(())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), TiercastError> {
    if let Some(raw) = config.get_string("logging", "format") {
        raw.parse::<LogFormat>()
            .map_err(|reason| invalid("logging", "format", reason))?;
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TiercastError {
    TiercastError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        }
    }

    fn assert_invalid(config: MapConfig, key: &str) {
        match AppConfig::from_port(&config) {
            Err(TiercastError::ConfigInvalid { key: k, .. }) => assert_eq!(k, key),
            other => panic!("expected ConfigInvalid for {key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_port(&MapConfig::new(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.synthetic.seed, 42);
        assert_eq!(config.synthetic.days, 1095);
    }

    #[test]
    fn full_config_resolves() {
        let config = AppConfig::from_port(&MapConfig::new(&[
            ("data", "path", "/srv/ohlc.csv"),
            ("synthetic", "seed", "7"),
            ("synthetic", "days", "30"),
            ("logging", "level", "debug"),
            ("logging", "format", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/ohlc.csv"));
        assert_eq!(config.synthetic, SyntheticConfig { seed: 7, days: 30 });
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn negative_seed_rejected() {
        assert_invalid(MapConfig::new(&[("synthetic", "seed", "-1")]), "seed");
    }

    #[test]
    fn seed_above_i64_range_accepted() {
        let config = AppConfig::from_port(&MapConfig::new(&[(
            "synthetic",
            "seed",
            "18446744073709551615",
        )]))
        .unwrap();
        assert_eq!(config.synthetic.seed, u64::MAX);

        let config = AppConfig::from_port(&MapConfig::new(&[(
            "synthetic",
            "seed",
            "9223372036854775808",
        )]))
        .unwrap();
        assert_eq!(config.synthetic.seed, 1 << 63);
    }

    #[test]
    fn seed_past_u64_range_rejected() {
        assert_invalid(
            MapConfig::new(&[("synthetic", "seed", "18446744073709551616")]),
            "seed",
        );
    }

    #[test]
    fn non_numeric_seed_rejected() {
        assert_invalid(MapConfig::new(&[("synthetic", "seed", "abc")]), "seed");
    }

    #[test]
    fn non_positive_days_rejected() {
        assert_invalid(MapConfig::new(&[("synthetic", "days", "0")]), "days");
        assert_invalid(MapConfig::new(&[("synthetic", "days", "-5")]), "days");
    }

    #[test]
    fn unknown_log_format_rejected() {
        assert_invalid(MapConfig::new(&[("logging", "format", "xml")]), "format");
    }

    #[test]
    fn empty_data_path_rejected() {
        assert_invalid(MapConfig::new(&[("data", "path", "  ")]), "path");
    }

    #[test]
    fn config_errors_carry_config_code() {
        let err = validate_config(&MapConfig::new(&[("synthetic", "days", "0")])).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }
}
