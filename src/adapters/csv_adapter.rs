//! CSV file data adapter.
//!
//! One file holds every symbol, with the header
//! `date,symbol,open,high,low,close,volume` in any column order.

use crate::domain::error::TiercastError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::str::FromStr;

const COLUMNS: [&str; 7] = ["date", "symbol", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse<R: Read>(&self, reader: R) -> Result<Vec<PriceBar>, TiercastError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers().map_err(|e| load_error(format!(
            "failed to read header of {}: {}",
            self.path.display(),
            e
        )))?;
        let mut index = [0usize; COLUMNS.len()];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| load_error(format!("missing {} column", name)))?;
        }
        let [date_i, symbol_i, open_i, high_i, low_i, close_i, volume_i] = index;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            // header is line 1
            let line = row + 2;
            let record =
                result.map_err(|e| load_error(format!("CSV parse error at line {}: {}", line, e)))?;
            let field = |i: usize, name: &str| {
                record
                    .get(i)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| load_error(format!("line {}: missing {} value", line, name)))
            };

            let date = NaiveDate::parse_from_str(field(date_i, "date")?, "%Y-%m-%d")
                .map_err(|e| load_error(format!("line {}: invalid date: {}", line, e)))?;

            bars.push(PriceBar {
                symbol: field(symbol_i, "symbol")?.to_string(),
                date,
                open: parse_number(field(open_i, "open")?, "open", line)?,
                high: parse_number(field(high_i, "high")?, "high", line)?,
                low: parse_number(field(low_i, "low")?, "low", line)?,
                close: parse_number(field(close_i, "close")?, "close", line)?,
                volume: parse_number(field(volume_i, "volume")?, "volume", line)?,
            });
        }

        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn load_bars(&self) -> Result<Option<Vec<PriceBar>>, TiercastError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(load_error(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };
        self.parse(file).map(Some)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_number<T>(raw: &str, name: &str, line: usize) -> Result<T, TiercastError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| load_error(format!("line {}: invalid {} value '{}': {}", line, name, raw, e)))
}

fn load_error(reason: String) -> TiercastError {
    TiercastError::DataLoad { reason }
}
