//! Market data access port trait.

use crate::domain::error::StratError;
use crate::domain::market::MarketData;

pub trait MarketDataPort {
    /// Latest snapshot for `symbol`, with its price history ordered oldest first.
    fn fetch_market_data(&self, symbol: &str) -> Result<MarketData, StratError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratError>;
}
