//! Action block parser.
//!
//! An action block may hold one `buy(...)` and one `sell(...)` call; the first
//! occurrence of each is used and buy is always reported before sell.

use crate::domain::rule::{Action, ParamValue, Parameters};
use crate::domain::scanner::{occurrences, Scanner};

pub fn parse(input: &str) -> Vec<Action> {
    let mut actions = Vec::new();

    if let Some(args) = find_call(input, "buy", false) {
        actions.push(Action::Buy {
            parameters: parse_parameters(args),
        });
    }

    if let Some(args) = find_call(input, "sell", true) {
        actions.push(Action::Sell {
            parameters: parse_parameters(args),
        });
    }

    actions
}

/// Finds the first `<keyword> ( <args> )` in `input`.
fn find_call<'a>(input: &'a str, keyword: &'a str, allow_empty: bool) -> Option<&'a str> {
    occurrences(input, keyword).find_map(|start| {
        let mut scanner = Scanner::at(input, start + keyword.len());
        scanner
            .parenthesized()
            .filter(|args| allow_empty || !args.is_empty())
    })
}

/// Parses `token, key=value, ...` into a parameter map.
///
/// `N%` becomes the number `N`. Values that are not numbers are kept as text.
/// A bare positional entry sets `token` unless it is already present.
pub fn parse_parameters(input: &str) -> Parameters {
    let mut parameters = Parameters::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if part.contains('=') {
            let mut pieces = part.split('=').map(str::trim);
            let key = pieces.next().unwrap_or_default();
            let value = pieces.next().unwrap_or_default();
            if key.is_empty() {
                continue;
            }
            parameters.insert(key.to_string(), parse_value(value));
        } else if !parameters.contains_key("token") {
            parameters.insert("token".to_string(), ParamValue::Text(part.to_string()));
        }
    }

    parameters
}

fn parse_value(value: &str) -> ParamValue {
    let numeric = value.strip_suffix('%').unwrap_or(value).trim();
    match numeric.parse::<f64>() {
        Ok(n) if n.is_finite() => ParamValue::Number(n),
        _ => ParamValue::Text(value.to_string()),
    }
}
