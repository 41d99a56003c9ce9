//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n prices, then walk forward:
//! EMA = (P - EMA) * k + EMA. Returns 0 with fewer than n prices.

use crate::domain::indicator::sma::calculate_sma;

pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = calculate_sma(&prices[..period], period);

    for &price in &prices[period..] {
        ema = (price - ema) * k + ema;
    }

    ema
}
