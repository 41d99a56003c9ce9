#![allow(dead_code)]

use stratlang::domain::error::StratError;
use stratlang::domain::market::MarketData;
use stratlang::domain::rule::{Condition, Expression};
use stratlang::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;
use std::io::Write;

pub const MA_CROSS: &str = r#"strategy("MA Cross") {
    if price > sma(50) {
        buy(token=SOL, qty=1, sl=2%, tp=5%)
    }
}"#;

pub struct MockMarketDataPort {
    pub data: HashMap<String, MarketData>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_market(mut self, symbol: &str, market: MarketData) -> Self {
        self.data.insert(symbol.to_string(), market);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_market_data(&self, symbol: &str) -> Result<MarketData, StratError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratError::MarketData {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| StratError::MarketData {
                reason: format!("unknown symbol {}", symbol),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn market(price: f64, volume: f64, prices: Vec<f64>) -> MarketData {
    MarketData {
        price,
        volume,
        prices,
    }
}

/// Steadily rising history ending at `last`.
pub fn rising_prices(count: usize, last: f64) -> Vec<f64> {
    (0..count)
        .map(|i| last - (count - 1 - i) as f64)
        .collect()
}

/// Condition whose deepest node sits at `depth`, counting the root as 0.
pub fn nested_condition(depth: usize) -> Condition {
    let leaf = || Condition::FunctionCall {
        expression: Expression::Price,
    };
    (1..depth).fold(leaf(), |inner, _| Condition::And {
        left: Box::new(inner),
        right: Box::new(leaf()),
    })
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
