//! Rule AST data structures.
//!
//! This module defines the abstract syntax tree for strategy rules:
//! - `Expression`: What can be tested or compared (signal text, market fields, indicators, constants)
//! - `Condition`: Boolean combinations of comparisons and bare expressions
//! - `Action`: The order a rule requests when it fires
//! - `Rule`: One `if { }` block
//!
//! All nodes serialise to an internally tagged JSON form keyed on `"type"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    #[serde(rename = "tweet.contains")]
    TweetContains {
        #[serde(rename = "value")]
        text: String,
    },
    #[serde(rename = "token.volume")]
    TokenVolume,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "rsi")]
    Rsi { period: usize },
    #[serde(rename = "sma")]
    Sma { period: usize },
    #[serde(rename = "ema")]
    Ema { period: usize },
    #[serde(rename = "literal")]
    Literal { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
}

impl ComparisonOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(ComparisonOp::Gt),
            "<" => Some(ComparisonOp::Lt),
            ">=" => Some(ComparisonOp::Ge),
            "<=" => Some(ComparisonOp::Le),
            "==" => Some(ComparisonOp::Eq),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    #[serde(rename = "and")]
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    #[serde(rename = "or")]
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    #[serde(rename = "comparison")]
    Comparison {
        left: Expression,
        operator: ComparisonOp,
        right: Expression,
    },
    #[serde(rename = "function")]
    FunctionCall { expression: Expression },
}

/// An action parameter value. `N%` is stored as `Number(N)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Text(s) => Some(s),
        }
    }
}

pub type Parameters = BTreeMap<String, ParamValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "buy")]
    Buy { parameters: Parameters },
    #[serde(rename = "sell")]
    Sell { parameters: Parameters },
}

impl Action {
    pub fn parameters(&self) -> &Parameters {
        match self {
            Action::Buy { parameters } | Action::Sell { parameters } => parameters,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.parameters().get("token").and_then(ParamValue::as_text)
    }

    pub fn qty(&self) -> Option<f64> {
        self.parameters().get("qty").and_then(ParamValue::as_number)
    }

    /// Stop loss in percentage points.
    pub fn stop_loss(&self) -> Option<f64> {
        self.parameters().get("sl").and_then(ParamValue::as_number)
    }

    /// Take profit in percentage points.
    pub fn take_profit(&self) -> Option<f64> {
        self.parameters().get("tp").and_then(ParamValue::as_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: Condition,
    pub actions: Vec<Action>,
}
