//! Simple Moving Average.
//!
//! SMA(n) = mean of the last n prices. Returns 0 with fewer than n prices.

pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return 0.0;
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_insufficient_data_is_zero() {
        let prices: Vec<f64> = (0..49).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_sma(&prices, 50), 0.0);
    }

    #[test]
    fn sma_empty() {
        assert_eq!(calculate_sma(&[], 3), 0.0);
    }

    #[test]
    fn sma_uses_last_window() {
        let prices = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(calculate_sma(&prices, 3), 4.0);
    }

    #[test]
    fn sma_exact_length() {
        let prices = [10.0, 20.0, 30.0];
        assert_relative_eq!(calculate_sma(&prices, 3), 20.0);
    }

    #[test]
    fn sma_period_1_is_last_price() {
        assert_relative_eq!(calculate_sma(&[3.0, 7.0], 1), 7.0);
    }

    #[test]
    fn sma_huge_period_is_zero() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0], usize::MAX), 0.0);
    }

    #[test]
    fn sma_period_0() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), 0.0);
    }
}
