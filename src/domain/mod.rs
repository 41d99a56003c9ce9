//! Core domain types and logic.

pub mod action_parser;
pub mod condition_parser;
pub mod error;
pub mod evaluator;
pub mod expression_parser;
pub mod indicator;
pub mod market;
pub mod rule;
pub mod sandbox;
pub mod sandbox_config;
pub(crate) mod scanner;
pub mod strategy;
pub mod strategy_parser;
