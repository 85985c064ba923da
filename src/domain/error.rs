//! Domain error types and the stable error codes surfaced to callers.

use std::fmt;

/// Stable, caller-facing error kind.
///
/// The string form (`as_str`) is part of the external contract: an HTTP layer
/// maps these to status codes, so the spelling must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DataNotLoaded,
    SymbolNotFound,
    DateRangeRestricted,
    IndicatorNotPermitted,
    InvalidParameter,
    DataLoadError,
    DataRetrievalError,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DataNotLoaded => "DATA_NOT_LOADED",
            ErrorCode::SymbolNotFound => "SYMBOL_NOT_FOUND",
            ErrorCode::DateRangeRestricted => "DATE_RANGE_RESTRICTED",
            ErrorCode::IndicatorNotPermitted => "INDICATOR_NOT_PERMITTED",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::DataLoadError => "DATA_LOAD_ERROR",
            ErrorCode::DataRetrievalError => "DATA_RETRIEVAL_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for tiercast.
#[derive(Debug, thiserror::Error)]
pub enum TiercastError {
    #[error("data not loaded")]
    NotLoaded,

    #[error("failed to load stock data: {reason}")]
    DataLoad { reason: String },

    #[error("symbol {symbol} not found")]
    SymbolNotFound { symbol: String },

    #[error("start date {start} too far back for {tier} tier, earliest allowed: {earliest}")]
    DateRangeRestricted {
        tier: String,
        start: chrono::NaiveDate,
        earliest: chrono::NaiveDate,
    },

    #[error("indicator {indicator} not available for {tier} tier")]
    IndicatorNotPermitted { indicator: String, tier: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("failed to retrieve stock data: {reason}")]
    DataRetrieval { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },
}

impl TiercastError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        TiercastError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TiercastError::NotLoaded => ErrorCode::DataNotLoaded,
            TiercastError::DataLoad { .. } => ErrorCode::DataLoadError,
            TiercastError::SymbolNotFound { .. } => ErrorCode::SymbolNotFound,
            TiercastError::DateRangeRestricted { .. } => ErrorCode::DateRangeRestricted,
            TiercastError::IndicatorNotPermitted { .. } => ErrorCode::IndicatorNotPermitted,
            TiercastError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            TiercastError::DataRetrieval { .. } => ErrorCode::DataRetrievalError,
            TiercastError::ConfigParse { .. } | TiercastError::ConfigInvalid { .. } => {
                ErrorCode::ConfigError
            }
        }
    }
}

impl From<&TiercastError> for std::process::ExitCode {
    fn from(err: &TiercastError) -> Self {
        let code: u8 = match err {
            TiercastError::ConfigParse { .. } | TiercastError::ConfigInvalid { .. } => 2,
            TiercastError::DataLoad { .. } => 3,
            TiercastError::NotLoaded | TiercastError::SymbolNotFound { .. } => 4,
            TiercastError::DateRangeRestricted { .. }
            | TiercastError::IndicatorNotPermitted { .. } => 5,
            TiercastError::InvalidParameter { .. } => 6,
            TiercastError::DataRetrieval { .. } => 7,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(ErrorCode::DataNotLoaded.as_str(), "DATA_NOT_LOADED");
        assert_eq!(ErrorCode::SymbolNotFound.as_str(), "SYMBOL_NOT_FOUND");
        assert_eq!(
            ErrorCode::DateRangeRestricted.as_str(),
            "DATE_RANGE_RESTRICTED"
        );
        assert_eq!(
            ErrorCode::IndicatorNotPermitted.as_str(),
            "INDICATOR_NOT_PERMITTED"
        );
        assert_eq!(ErrorCode::InvalidParameter.as_str(), "INVALID_PARAMETER");
        assert_eq!(ErrorCode::DataLoadError.as_str(), "DATA_LOAD_ERROR");
        assert_eq!(
            ErrorCode::DataRetrievalError.as_str(),
            "DATA_RETRIEVAL_ERROR"
        );
    }

    #[test]
    fn error_maps_to_code() {
        let err = TiercastError::SymbolNotFound {
            symbol: "ZZZZ".into(),
        };
        assert_eq!(err.code(), ErrorCode::SymbolNotFound);
        assert_eq!(err.to_string(), "symbol ZZZZ not found");

        let err = TiercastError::invalid_parameter("period", "must be at least 1");
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(
            err.to_string(),
            "invalid parameter period: must be at least 1"
        );
    }

    #[test]
    fn date_range_message_names_earliest_date() {
        let err = TiercastError::DateRangeRestricted {
            tier: "free".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            earliest: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(err.code(), ErrorCode::DateRangeRestricted);
        assert!(err.to_string().contains("earliest allowed: 2024-03-01"));
    }

    #[test]
    fn config_errors_share_a_code() {
        let parse = TiercastError::ConfigParse {
            file: "x.ini".into(),
            reason: "bad".into(),
        };
        let invalid = TiercastError::ConfigInvalid {
            section: "logging".into(),
            key: "format".into(),
            reason: "bad".into(),
        };
        assert_eq!(parse.code(), ErrorCode::ConfigError);
        assert_eq!(invalid.code(), ErrorCode::ConfigError);
    }
}
