//! Strategy DSL parser.
//!
//! Grammar:
//!
//! ```text
//! strategy("<name>") {
//!     if <condition> { <action>(<params>) ... }
//!     ...
//! }
//! ```
//!
//! Each `if` block body is delimited by a single pair of braces. Nested
//! braces inside an action block are not supported: the body ends at the
//! first `}`.
//!
//! Parsing stops at the first error; no partial strategy is produced.

use crate::domain::action_parser;
use crate::domain::condition_parser;
use crate::domain::error::ParseError;
use crate::domain::rule::Rule;
use crate::domain::scanner::{is_word_char, occurrences, Scanner};
use crate::domain::strategy::Strategy;

pub fn parse(code: &str) -> Result<Strategy, ParseError> {
    let name = find_name(code).ok_or_else(|| ParseError::new("Strategy name not found"))?;

    let mut rules = Vec::new();
    for (condition_text, actions_text) in find_blocks(code)? {
        let condition = condition_parser::parse(condition_text)?;
        let actions = action_parser::parse(actions_text);
        if actions.is_empty() {
            tracing::debug!(condition = condition_text, "if block requests no actions");
        }
        rules.push(Rule { condition, actions });
    }

    tracing::debug!(strategy = name, rules = rules.len(), "parsed strategy");

    Ok(Strategy {
        name: name.to_string(),
        rules,
    })
}

/// Returns every problem found in `code`. Parsing stops at the first error,
/// so the list holds at most one element.
pub fn validate(code: &str) -> Vec<ParseError> {
    match parse(code) {
        Ok(_) => Vec::new(),
        Err(err) => vec![err],
    }
}

/// Canonical pretty-printed JSON form of a strategy.
pub fn to_json(strategy: &Strategy) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(strategy)
}

pub fn from_json(json: &str) -> Result<Strategy, serde_json::Error> {
    serde_json::from_str(json)
}

/// First `strategy ( "<name>" )` call anywhere in the source.
fn find_name(code: &str) -> Option<&str> {
    occurrences(code, "strategy").find_map(|start| Scanner::at(code, start).quoted_call("strategy"))
}

/// Splits the source into `(condition, body)` pairs, one per `if` block.
fn find_blocks(code: &str) -> Result<Vec<(&str, &str)>, ParseError> {
    let mut blocks = Vec::new();
    let mut scanner = Scanner::new(code);

    while let Some(offset) = next_if_keyword(scanner.remaining()) {
        scanner = Scanner::at(code, scanner.pos() + offset + "if".len());

        let condition = scanner
            .take_until(|c| c == '{')
            .ok_or_else(|| ParseError::new("Unmatched if block: missing '{'"))?;
        scanner.advance();

        let body = scanner
            .take_until(|c| c == '}')
            .ok_or_else(|| ParseError::new("Unmatched if block: missing '}'"))?;
        scanner.advance();

        let condition = condition.trim();
        let body = body.trim();
        if body.is_empty() {
            return Err(ParseError::new(format!(
                "Empty action block for condition: {}",
                condition
            )));
        }
        blocks.push((condition, body));
    }

    Ok(blocks)
}

/// Offset of the next standalone `if` keyword that is followed by whitespace.
fn next_if_keyword(text: &str) -> Option<usize> {
    occurrences(text, "if").find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + 2..].chars().next();
        !before.is_some_and(is_word_char) && after.is_some_and(char::is_whitespace)
    })
}
