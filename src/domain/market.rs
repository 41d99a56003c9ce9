//! Signal and market context supplied by external collaborators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A classified trading signal. Only the originating text is inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(default)]
    pub text: String,
}

impl Signal {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Market snapshot: latest price and volume plus the price history used by
/// indicators, ordered oldest to newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub prices: Vec<f64>,
}

/// One dated observation from a price feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: f64,
}

impl MarketData {
    /// Builds a snapshot from unordered observations. The latest point
    /// supplies `price` and `volume`.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let (price, volume) = points
            .last()
            .map(|p| (p.price, p.volume))
            .unwrap_or_default();
        Self {
            price,
            volume,
            prices: points.into_iter().map(|p| p.price).collect(),
        }
    }
}
