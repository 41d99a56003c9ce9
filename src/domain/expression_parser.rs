//! Expression clause parser.
//!
//! Recognises, in priority order, each anchored to the whole trimmed clause:
//! `tweet.contains("<text>")`, `token.volume`, `price`, `rsi(<n>)`,
//! `sma(<n>)`, `ema(<n>)` and bare numeric literals.

use crate::domain::error::ParseError;
use crate::domain::rule::Expression;
use crate::domain::scanner::Scanner;

pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let text = input.trim();

    if let Some(needle) = whole(text, |s| s.quoted_call("tweet.contains")) {
        return Ok(Expression::TweetContains {
            text: needle.to_string(),
        });
    }

    match text {
        "token.volume" => return Ok(Expression::TokenVolume),
        "price" => return Ok(Expression::Price),
        _ => {}
    }

    for keyword in ["rsi", "sma", "ema"] {
        if let Some(digits) = whole(text, |s| s.integer_call(keyword)) {
            let period = parse_period(digits, text)?;
            return Ok(match keyword {
                "rsi" => Expression::Rsi { period },
                "sma" => Expression::Sma { period },
                _ => Expression::Ema { period },
            });
        }
    }

    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(Expression::Literal { value }),
            Ok(_) => return Err(ParseError::new(format!("Literal out of range: {}", text))),
            Err(_) => {}
        }
    }

    Err(ParseError::new(format!("Unknown expression: {}", text)))
}

/// Runs `f` from the start of `text` and accepts the match only if it
/// consumed the whole clause.
fn whole<'a, F>(text: &'a str, f: F) -> Option<&'a str>
where
    F: FnOnce(&mut Scanner<'a>) -> Option<&'a str>,
{
    let mut scanner = Scanner::new(text);
    let matched = f(&mut scanner)?;
    scanner.is_at_end().then_some(matched)
}

fn parse_period(digits: &str, text: &str) -> Result<usize, ParseError> {
    let period = digits
        .parse::<usize>()
        .map_err(|_| ParseError::new(format!("Invalid period: {}", text)))?;
    if period == 0 {
        return Err(ParseError::new(format!("Period must be positive: {}", text)));
    }
    Ok(period)
}
