//! RSI (Relative Strength Index).
//!
//! Simple averages over the last n price changes, without Wilder smoothing:
//! - avg_gain = sum of positive changes / n
//! - avg_loss = sum of absolute negative changes / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Fewer than n + 1 prices yields the neutral value 50.

pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;

    for pair in prices[prices.len() - period - 1..].windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
