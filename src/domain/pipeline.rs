//! Request pipeline: validate, clamp to the tier window, fetch, compute.
//!
//! A request moves through `Validating → RangeClamping → Fetching →
//! Computing → Done`. The first failure aborts the request with its own
//! error; nothing partial is returned.

use crate::domain::error::TiercastError;
use crate::domain::indicator::{IndicatorKind, IndicatorParams};
use crate::domain::ohlcv::SeriesSlice;
use crate::domain::store::TimeSeriesStore;
use crate::domain::tier::Tier;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tier: Tier,
    pub indicator: IndicatorKind,
    pub params: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Validating,
    RangeClamping,
    Fetching,
    Computing,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Validating => "validating",
            PipelineState::RangeClamping => "range_clamping",
            PipelineState::Fetching => "fetching",
            PipelineState::Computing => "computing",
            PipelineState::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub name: String,
    pub points: Vec<ChannelPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    pub symbol: String,
    pub indicator: IndicatorKind,
    pub parameters: IndicatorParams,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub channels: Vec<Channel>,
}

impl IndicatorResult {
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// Runs requests against a loaded store. `today` anchors the tier windows.
#[derive(Debug, Clone, Copy)]
pub struct QueryPipeline<'a> {
    store: &'a TimeSeriesStore,
    today: NaiveDate,
}

impl<'a> QueryPipeline<'a> {
    pub fn new(store: &'a TimeSeriesStore) -> Self {
        Self::with_today(store, chrono::Local::now().date_naive())
    }

    pub fn with_today(store: &'a TimeSeriesStore, today: NaiveDate) -> Self {
        Self { store, today }
    }

    pub fn list_symbols(&self) -> Result<Vec<String>, TiercastError> {
        self.store.list_symbols()
    }

    pub fn run(&self, request: &IndicatorRequest) -> Result<IndicatorResult, TiercastError> {
        self.execute(request).inspect_err(|e| {
            warn!(
                code = %e.code(),
                symbol = %request.symbol,
                indicator = %request.indicator,
                tier = %request.tier,
                "indicator request failed: {}", e
            );
        })
    }

    /// Tier-checked raw bars, with no indicator applied.
    pub fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        tier: Tier,
    ) -> Result<SeriesSlice, TiercastError> {
        self.execute_fetch(symbol, start, end, tier)
            .inspect_err(|e| {
                warn!(code = %e.code(), symbol, tier = %tier, "bar request failed: {}", e);
            })
    }

    fn execute(&self, request: &IndicatorRequest) -> Result<IndicatorResult, TiercastError> {
        transition(PipelineState::Validating, &request.symbol);
        self.validate_common(&request.symbol, request.start_date, request.end_date)?;
        request.tier.check_permitted(request.indicator)?;
        let params = IndicatorParams::from_bag(request.indicator, &request.params)?;

        transition(PipelineState::RangeClamping, &request.symbol);
        let (start, end) = request
            .tier
            .clamp_range(request.start_date, request.end_date, self.today)?;

        transition(PipelineState::Fetching, &request.symbol);
        let slice = self.store.query_slice(&request.symbol, start, end)?;

        transition(PipelineState::Computing, &request.symbol);
        let computed = params.compute(&slice.closes())?;

        transition(PipelineState::Done, &request.symbol);
        let dates = slice.dates();
        let channels = computed
            .into_iter()
            .map(|channel| {
                if channel.values.len() != dates.len() {
                    return Err(TiercastError::DataRetrieval {
                        reason: format!(
                            "channel {} has {} values for {} bars",
                            channel.name,
                            channel.values.len(),
                            dates.len()
                        ),
                    });
                }
                let points = dates
                    .iter()
                    .zip(channel.values)
                    .map(|(&date, value)| ChannelPoint { date, value })
                    .collect();
                Ok(Channel {
                    name: channel.name.to_string(),
                    points,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndicatorResult {
            symbol: request.symbol.clone(),
            indicator: request.indicator,
            parameters: params,
            start_date: request.start_date,
            end_date: request.end_date,
            channels,
        })
    }

    fn execute_fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        tier: Tier,
    ) -> Result<SeriesSlice, TiercastError> {
        transition(PipelineState::Validating, symbol);
        self.validate_common(symbol, start, end)?;

        transition(PipelineState::RangeClamping, symbol);
        let (start, end) = tier.clamp_range(start, end, self.today)?;

        transition(PipelineState::Fetching, symbol);
        let slice = self.store.query_slice(symbol, start, end)?;

        transition(PipelineState::Done, symbol);
        Ok(slice)
    }

    /// Date order first, then loaded store, then symbol membership.
    fn validate_common(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), TiercastError> {
        if start > end {
            return Err(TiercastError::invalid_parameter(
                "start_date",
                format!("start date {} is after end date {}", start, end),
            ));
        }
        if !self.store.contains(symbol)? {
            return Err(TiercastError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(())
    }
}

fn transition(state: PipelineState, symbol: &str) {
    debug!(state = %state, symbol, "pipeline transition");
}
