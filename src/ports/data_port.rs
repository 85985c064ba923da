//! Data access port trait.

use crate::domain::error::TiercastError;
use crate::domain::ohlcv::PriceBar;

/// A backing source for the OHLC dataset, read once at startup.
pub trait DataPort {
    /// Read every row of the dataset, in any order.
    ///
    /// `Ok(None)` means the source does not exist, which lets the store fall
    /// back to synthetic data. A source that exists but cannot be read or
    /// parsed is a `DataLoad` error.
    fn load_bars(&self) -> Result<Option<Vec<PriceBar>>, TiercastError>;

    /// Human-readable location of the source, for logs.
    fn describe(&self) -> String;
}
