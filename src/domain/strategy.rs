//! Parsed strategy definition.

use crate::domain::rule::Rule;
use serde::{Deserialize, Serialize};

/// A named set of rules. Produced once by parsing and read-only afterwards.
///
/// An empty `rules` list is an inert strategy that never fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Strategy {
    pub fn is_inert(&self) -> bool {
        self.rules.is_empty()
    }
}
