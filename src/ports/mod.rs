//! Port traits: interfaces between domain and adapters.

pub mod config_port;
pub mod market_data_port;
