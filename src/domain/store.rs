//! In-memory OHLC snapshot, loaded once and read-only afterwards.

use crate::domain::error::TiercastError;
use crate::domain::ohlcv::{PriceBar, SeriesSlice};
use crate::domain::synthetic::{self, SyntheticConfig};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Where the loaded snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    File(String),
    Synthetic,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "file {}", path),
            DataSource::Synthetic => f.write_str("synthetic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub source: DataSource,
    pub symbols: usize,
    pub bars: usize,
}

/// First date, last date and bar count for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRange {
    pub symbol: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bar_count: usize,
}

#[derive(Debug)]
struct Snapshot {
    source: DataSource,
    // each series is non-empty and strictly increasing by date
    series: BTreeMap<String, Vec<PriceBar>>,
}

impl Snapshot {
    fn build(source: DataSource, rows: Vec<PriceBar>) -> Result<Self, TiercastError> {
        let mut series: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();
        for bar in rows {
            bar.check()
                .map_err(|reason| TiercastError::DataLoad { reason })?;
            match series.entry(bar.symbol.clone()) {
                Entry::Occupied(mut e) => e.get_mut().push(bar),
                Entry::Vacant(e) => {
                    e.insert(vec![bar]);
                }
            }
        }

        for (symbol, bars) in series.iter_mut() {
            bars.sort_by_key(|b| b.date);
            if let Some(dup) = bars.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(TiercastError::DataLoad {
                    reason: format!("duplicate bar for {} on {}", symbol, dup[0].date),
                });
            }
        }

        Ok(Self { source, series })
    }

    fn bar_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    fn series(&self, symbol: &str) -> Result<&[PriceBar], TiercastError> {
        self.series
            .get(symbol)
            .map(Vec::as_slice)
            .ok_or_else(|| TiercastError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

/// Shared, read-only store of daily bars per symbol.
///
/// Starts empty. `load` fills it exactly once; every read before that fails
/// with `NotLoaded`. After loading, any number of threads may read it through
/// `&TimeSeriesStore` without locking.
#[derive(Debug, Default)]
pub struct TimeSeriesStore {
    snapshot: OnceLock<Snapshot>,
}

impl TimeSeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the store from `port`. An absent source falls back to the
    /// synthetic dataset generated for `today`.
    pub fn load(
        &self,
        port: &dyn DataPort,
        synthetic_config: SyntheticConfig,
        today: NaiveDate,
    ) -> Result<LoadSummary, TiercastError> {
        if self.is_loaded() {
            return Err(already_loaded());
        }

        let (source, rows) = match port.load_bars()? {
            Some(rows) => (DataSource::File(port.describe()), rows),
            None => {
                warn!(
                    source = %port.describe(),
                    seed = synthetic_config.seed,
                    "dataset not found, generating synthetic data"
                );
                (
                    DataSource::Synthetic,
                    synthetic::generate(today, synthetic_config),
                )
            }
        };

        let snapshot = Snapshot::build(source, rows)?;
        let summary = LoadSummary {
            source: snapshot.source.clone(),
            symbols: snapshot.series.len(),
            bars: snapshot.bar_count(),
        };
        self.snapshot.set(snapshot).map_err(|_| already_loaded())?;

        info!(
            source = %summary.source,
            symbols = summary.symbols,
            bars = summary.bars,
            "stock data loaded"
        );
        Ok(summary)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.get().is_some()
    }

    pub fn source(&self) -> Result<&DataSource, TiercastError> {
        Ok(&self.snapshot()?.source)
    }

    /// Sorted, deduplicated symbol list.
    pub fn list_symbols(&self) -> Result<Vec<String>, TiercastError> {
        Ok(self.snapshot()?.series.keys().cloned().collect())
    }

    pub fn contains(&self, symbol: &str) -> Result<bool, TiercastError> {
        Ok(self.snapshot()?.series.contains_key(symbol))
    }

    /// Bars for `symbol` with `start <= date <= end`, ascending. An unknown
    /// symbol is an error; a known symbol with no bars in range is not.
    pub fn query_slice(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesSlice, TiercastError> {
        let bars = self.snapshot()?.series(symbol)?;
        let lo = bars.partition_point(|b| b.date < start);
        let hi = bars.partition_point(|b| b.date <= end).max(lo);
        Ok(SeriesSlice::new(symbol, bars[lo..hi].to_vec()))
    }

    pub fn data_range(&self, symbol: &str) -> Result<DataRange, TiercastError> {
        let bars = self.snapshot()?.series(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(DataRange {
                symbol: symbol.to_string(),
                first_date: first.date,
                last_date: last.date,
                bar_count: bars.len(),
            }),
            _ => Err(TiercastError::DataRetrieval {
                reason: format!("no bars stored for {}", symbol),
            }),
        }
    }

    fn snapshot(&self) -> Result<&Snapshot, TiercastError> {
        self.snapshot.get().ok_or(TiercastError::NotLoaded)
    }
}

fn already_loaded() -> TiercastError {
    TiercastError::DataLoad {
        reason: "store already loaded".to_string(),
    }
}
