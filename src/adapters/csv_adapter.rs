//! CSV file market data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` with a `date,price,volume` header. Rows
//! may appear in any order; the snapshot's history is sorted by date.

use crate::domain::error::StratError;
use crate::domain::market::{MarketData, PricePoint};
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn market_error(reason: impl Into<String>) -> StratError {
    StratError::MarketData {
        reason: reason.into(),
    }
}

fn parse_column(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, StratError> {
    record
        .get(index)
        .ok_or_else(|| market_error(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| market_error(format!("invalid {} value: {}", name, e)))
}

impl MarketDataPort for CsvAdapter {
    fn fetch_market_data(&self, symbol: &str) -> Result<MarketData, StratError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| market_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| market_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| market_error("missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| market_error(format!("invalid date format: {}", e)))?;

            points.push(PricePoint {
                date,
                price: parse_column(&record, 1, "price")?,
                volume: parse_column(&record, 2, "volume")?,
            });
        }

        tracing::debug!(symbol, rows = points.len(), "loaded market data");
        Ok(MarketData::from_points(points))
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            market_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| market_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
