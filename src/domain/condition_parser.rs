//! Condition clause parser.
//!
//! Precedence is positional. The clause is split at the
//! first `" and "` if one exists, otherwise at the first `" or "`; the left
//! part and the remainder are parsed recursively, giving a right-leaning
//! tree. There is no parenthesisation, so `a or b and c` parses as
//! `And(Or(a, b), c)`.
//!
//! A clause without either keyword is a comparison if it contains an operator
//! character (`<`, `>`, `=`) after its first character, and a bare
//! function-call condition otherwise.

use crate::domain::error::ParseError;
use crate::domain::expression_parser;
use crate::domain::rule::{ComparisonOp, Condition};

/// Deepest `and`/`or` nesting accepted before parsing is abandoned.
pub const MAX_NESTING: usize = 256;

pub fn parse(input: &str) -> Result<Condition, ParseError> {
    parse_at_depth(input.trim(), 0)
}

fn parse_at_depth(text: &str, depth: usize) -> Result<Condition, ParseError> {
    if depth > MAX_NESTING {
        return Err(ParseError::new(format!(
            "Condition nesting exceeds {} levels",
            MAX_NESTING
        )));
    }

    if text.is_empty() {
        return Err(ParseError::new("Empty condition"));
    }

    if let Some((left, right)) = text.split_once(" and ") {
        return Ok(Condition::And {
            left: Box::new(parse_at_depth(left.trim(), depth + 1)?),
            right: Box::new(parse_at_depth(right.trim(), depth + 1)?),
        });
    }

    if let Some((left, right)) = text.split_once(" or ") {
        return Ok(Condition::Or {
            left: Box::new(parse_at_depth(left.trim(), depth + 1)?),
            right: Box::new(parse_at_depth(right.trim(), depth + 1)?),
        });
    }

    if let Some((left, op, right)) = split_comparison(text) {
        let operator = ComparisonOp::from_symbol(op)
            .ok_or_else(|| ParseError::new(format!("Unknown comparison operator: {}", op)))?;
        return Ok(Condition::Comparison {
            left: expression_parser::parse(left)?,
            operator,
            right: expression_parser::parse(right)?,
        });
    }

    Ok(Condition::FunctionCall {
        expression: expression_parser::parse(text)?,
    })
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=')
}

/// Splits `<left> <op> <right>` at the first operator character that has at
/// least one character before it. The operator is the maximal run of
/// operator characters; the right-hand side must be non-empty.
fn split_comparison(text: &str) -> Option<(&str, &str, &str)> {
    let first_len = text.chars().next()?.len_utf8();
    let start = first_len + text[first_len..].find(is_operator_char)?;
    let rest = &text[start..];
    let op_len = rest.find(|c| !is_operator_char(c)).unwrap_or(rest.len());
    let right = rest[op_len..].trim();
    if right.is_empty() {
        return None;
    }
    Some((text[..start].trim(), &rest[..op_len], right))
}
