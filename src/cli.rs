//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::AppConfig;
use crate::domain::error::TiercastError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::pipeline::{IndicatorRequest, QueryPipeline};
use crate::domain::store::TimeSeriesStore;
use crate::domain::tier::Tier;
use crate::obs;

#[derive(Parser, Debug)]
#[command(
    name = "tiercast",
    about = "Tiered OHLC retrieval and technical indicators"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset CSV, overrides [data] path
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available symbols
    Symbols,
    /// Show the stored date range for a symbol
    Info {
        #[arg(long)]
        symbol: String,
    },
    /// Show lookback and indicator access per tier
    Tiers,
    /// Fetch raw OHLC bars within the tier's window
    Bars {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "free")]
        tier: Tier,
    },
    /// Compute a technical indicator
    Indicator {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "free")]
        tier: Tier,
        #[arg(long)]
        indicator: IndicatorKind,
        /// Indicator parameter as key=value, repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match load_app_config(cli.config.as_deref(), cli.data.as_deref()) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };

    if let Err(e) = obs::init_tracing(&config.log_level, config.log_format) {
        let err = TiercastError::ConfigInvalid {
            section: "logging".to_string(),
            key: "level".to_string(),
            reason: e,
        };
        return report(&err);
    }

    let today = chrono::Local::now().date_naive();
    let stdout = std::io::stdout();
    match execute(&cli.command, &config, today, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &TiercastError) -> ExitCode {
    eprintln!("error[{}]: {}", err.code(), err);
    err.into()
}

/// Read and validate the configuration. Without a file every default
/// applies. `data_override` replaces `[data] path`.
pub fn load_app_config(
    config_path: Option<&Path>,
    data_override: Option<&Path>,
) -> Result<AppConfig, TiercastError> {
    let adapter = match config_path {
        Some(path) => FileConfigAdapter::from_file(path)?,
        None => FileConfigAdapter::empty(),
    };
    let mut config = AppConfig::from_port(&adapter)?;
    if let Some(path) = data_override {
        config.data_path = path.to_path_buf();
    }
    Ok(config)
}

/// Parse one `key=value` indicator parameter.
pub fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", raw));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("parameter {} must be a number, got '{}'", key, value.trim()))?;
    Ok((key.to_string(), value))
}

/// Build the parameter bag; a repeated key keeps its last value.
pub fn params_from_pairs(pairs: &[(String, f64)]) -> HashMap<String, f64> {
    pairs.iter().cloned().collect()
}

/// Run `command`, writing JSON to `out`. Every command except `tiers`
/// loads the store first.
pub fn execute(
    command: &Command,
    config: &AppConfig,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<(), TiercastError> {
    match command {
        Command::Tiers => {
            let specs: Vec<_> = Tier::ALL.into_iter().map(Tier::spec).collect();
            write_json(out, &specs)
        }
        Command::Symbols => {
            let store = load_store(config, today)?;
            let symbols = QueryPipeline::with_today(&store, today).list_symbols()?;
            write_json(out, &serde_json::json!({ "symbols": symbols }))
        }
        Command::Info { symbol } => {
            let store = load_store(config, today)?;
            write_json(out, &store.data_range(symbol)?)
        }
        Command::Bars {
            symbol,
            start,
            end,
            tier,
        } => {
            let store = load_store(config, today)?;
            let slice =
                QueryPipeline::with_today(&store, today).fetch_bars(symbol, *start, *end, *tier)?;
            write_json(out, &slice)
        }
        Command::Indicator {
            symbol,
            start,
            end,
            tier,
            indicator,
            params,
        } => {
            let store = load_store(config, today)?;
            let request = IndicatorRequest {
                symbol: symbol.clone(),
                start_date: *start,
                end_date: *end,
                tier: *tier,
                indicator: *indicator,
                params: params_from_pairs(params),
            };
            let result = QueryPipeline::with_today(&store, today).run(&request)?;
            write_json(out, &result)
        }
    }
}

pub fn load_store(config: &AppConfig, today: NaiveDate) -> Result<TimeSeriesStore, TiercastError> {
    let store = TimeSeriesStore::new();
    store.load(
        &CsvAdapter::new(config.data_path.clone()),
        config.synthetic,
        today,
    )?;
    Ok(store)
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), TiercastError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| TiercastError::DataRetrieval {
        reason: format!("failed to serialize result: {}", e),
    })?;
    writeln!(out, "{}", text).map_err(|e| TiercastError::DataRetrieval {
        reason: format!("failed to write output: {}", e),
    })
}
