//! Tracing subscriber setup. Logs go to stderr; stdout is reserved for
//! command output.

use crate::domain::config_validation::LogFormat;

pub const LOG_ENV_VAR: &str = "TIERCAST_LOG";

/// `TIERCAST_LOG`, when set, overrides the configured level.
pub fn resolve_filter(log_level: &str) -> String {
    std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| log_level.to_string())
}

pub fn init_tracing(log_level: &str, log_format: LogFormat) -> Result<(), String> {
    let env_filter = tracing_subscriber::EnvFilter::try_new(resolve_filter(log_level))
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = match log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
