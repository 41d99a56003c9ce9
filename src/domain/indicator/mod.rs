//! Technical indicators over a price history.
//!
//! Every indicator takes prices ordered oldest to newest and returns a single
//! value for the most recent bar. Insufficient history yields a fixed
//! fallback instead of an error:
//! - `RSI(n)`: 50 when fewer than `n + 1` prices
//! - `SMA(n)`, `EMA(n)`: 0 when fewer than `n` prices

pub mod ema;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Sma(usize),
    Ema(usize),
}

impl IndicatorType {
    pub fn calculate(self, prices: &[f64]) -> f64 {
        match self {
            IndicatorType::Rsi(period) => calculate_rsi(prices, period),
            IndicatorType::Sma(period) => calculate_sma(prices, period),
            IndicatorType::Ema(period) => calculate_ema(prices, period),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
        }
    }
}
