//! Strategy evaluation engine.
//!
//! Evaluates a parsed strategy against a signal and a market snapshot.
//!
//! # Evaluation Semantics
//!
//! - Rules are tried in order; the first rule whose condition holds wins
//! - An empty rule list never fires
//! - `and`: Short-circuits on first `false`
//! - `or`: Short-circuits on first `true`
//! - `tweet.contains`: Case-insensitive substring test on the signal text
//! - Comparisons coerce booleans to 1/0; `==` allows a relative error of 1e-9
//! - A bare function condition is truthy for `true` or a non-zero number
//!
//! The `*_within` variants check a [`Deadline`] at every condition and
//! expression so a sandboxed evaluation stops promptly once it expires.

use crate::domain::error::SandboxError;
use crate::domain::indicator::IndicatorType;
use crate::domain::market::{MarketData, Signal};
use crate::domain::rule::{ComparisonOp, Condition, Expression, Rule};
use crate::domain::sandbox::Deadline;
use crate::domain::strategy::Strategy;

/// Relative tolerance for `==`.
const EPSILON: f64 = 1e-9;

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    pub fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0 && !n.is_nan(),
            Value::Bool(b) => b,
        }
    }
}

struct Context<'a> {
    signal: &'a Signal,
    market: &'a MarketData,
    deadline: &'a Deadline,
}

pub fn evaluate(strategy: &Strategy, signal: &Signal, market: &MarketData) -> bool {
    first_match(strategy, signal, market).is_some()
}

/// The first rule whose condition holds, for the caller to execute its actions.
pub fn first_match<'a>(
    strategy: &'a Strategy,
    signal: &Signal,
    market: &MarketData,
) -> Option<&'a Rule> {
    // an unbounded deadline never expires, so the error arm is unreachable
    first_match_within(strategy, signal, market, &Deadline::unbounded()).unwrap_or(None)
}

pub fn evaluate_within(
    strategy: &Strategy,
    signal: &Signal,
    market: &MarketData,
    deadline: &Deadline,
) -> Result<bool, SandboxError> {
    Ok(first_match_within(strategy, signal, market, deadline)?.is_some())
}

pub fn first_match_within<'a>(
    strategy: &'a Strategy,
    signal: &Signal,
    market: &MarketData,
    deadline: &Deadline,
) -> Result<Option<&'a Rule>, SandboxError> {
    let ctx = Context {
        signal,
        market,
        deadline,
    };

    for (index, rule) in strategy.rules.iter().enumerate() {
        if evaluate_condition(&rule.condition, &ctx)? {
            tracing::debug!(strategy = %strategy.name, rule = index, "rule fired");
            return Ok(Some(rule));
        }
    }
    Ok(None)
}

fn evaluate_condition(condition: &Condition, ctx: &Context<'_>) -> Result<bool, SandboxError> {
    ctx.deadline.check()?;

    match condition {
        Condition::And { left, right } => {
            Ok(evaluate_condition(left, ctx)? && evaluate_condition(right, ctx)?)
        }
        Condition::Or { left, right } => {
            Ok(evaluate_condition(left, ctx)? || evaluate_condition(right, ctx)?)
        }
        Condition::Comparison {
            left,
            operator,
            right,
        } => {
            let left_val = resolve_expression(left, ctx)?;
            let right_val = resolve_expression(right, ctx)?;
            Ok(compare(left_val, *operator, right_val))
        }
        Condition::FunctionCall { expression } => Ok(resolve_expression(expression, ctx)?.is_truthy()),
    }
}

fn resolve_expression(expression: &Expression, ctx: &Context<'_>) -> Result<Value, SandboxError> {
    ctx.deadline.check()?;

    let value = match expression {
        Expression::TweetContains { text } => Value::Bool(
            ctx.signal
                .text
                .to_lowercase()
                .contains(&text.to_lowercase()),
        ),
        Expression::TokenVolume => Value::Number(ctx.market.volume),
        Expression::Price => Value::Number(ctx.market.price),
        Expression::Literal { value } => Value::Number(*value),
        Expression::Rsi { period } => indicator(IndicatorType::Rsi(*period), ctx),
        Expression::Sma { period } => indicator(IndicatorType::Sma(*period), ctx),
        Expression::Ema { period } => indicator(IndicatorType::Ema(*period), ctx),
    };
    Ok(value)
}

fn indicator(indicator: IndicatorType, ctx: &Context<'_>) -> Value {
    let value = indicator.calculate(&ctx.market.prices);
    tracing::trace!(%indicator, value, "computed indicator");
    Value::Number(value)
}

pub fn compare(left: Value, operator: ComparisonOp, right: Value) -> bool {
    let l = left.as_number();
    let r = right.as_number();
    match operator {
        ComparisonOp::Gt => l > r,
        ComparisonOp::Lt => l < r,
        ComparisonOp::Ge => l >= r,
        ComparisonOp::Le => l <= r,
        ComparisonOp::Eq => l == r || (l - r).abs() <= EPSILON * l.abs().max(r.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn market(price: f64, volume: f64, prices: Vec<f64>) -> MarketData {
        MarketData {
            price,
            volume,
            prices,
        }
    }

    fn strategy(conditions: Vec<Condition>) -> Strategy {
        Strategy {
            name: "Test".into(),
            rules: conditions
                .into_iter()
                .map(|condition| Rule {
                    condition,
                    actions: vec![],
                })
                .collect(),
        }
    }

    fn cmp(left: Expression, operator: ComparisonOp, right: Expression) -> Condition {
        Condition::Comparison {
            left,
            operator,
            right,
        }
    }

    fn lit(value: f64) -> Expression {
        Expression::Literal { value }
    }

    fn moon() -> Condition {
        Condition::FunctionCall {
            expression: Expression::TweetContains {
                text: "Moon".into(),
            },
        }
    }

    #[test]
    fn empty_strategy_never_fires() {
        let s = strategy(vec![]);
        assert!(!evaluate(&s, &Signal::new("moon"), &market(1.0, 1.0, vec![1.0])));
        assert!(!evaluate(&s, &Signal::default(), &MarketData::default()));
    }

    #[test]
    fn price_above_literal() {
        let s = strategy(vec![cmp(Expression::Price, ComparisonOp::Gt, lit(100.0))]);
        assert!(evaluate(&s, &Signal::default(), &market(105.0, 0.0, vec![])));
        assert!(!evaluate(&s, &Signal::default(), &market(95.0, 0.0, vec![])));
    }

    #[test]
    fn tweet_contains_is_case_insensitive() {
        let s = strategy(vec![moon()]);
        assert!(evaluate(&s, &Signal::new("SOL to the MOON"), &MarketData::default()));
        assert!(!evaluate(&s, &Signal::new("bearish"), &MarketData::default()));
    }

    #[test]
    fn and_or_short_circuit() {
        let volume_high = cmp(Expression::TokenVolume, ComparisonOp::Ge, lit(1000.0));
        let and = Condition::And {
            left: Box::new(moon()),
            right: Box::new(volume_high.clone()),
        };
        let or = Condition::Or {
            left: Box::new(moon()),
            right: Box::new(volume_high),
        };
        let signal = Signal::new("moon soon");
        let quiet = market(1.0, 10.0, vec![]);

        assert!(!evaluate(&strategy(vec![and]), &signal, &quiet));
        assert!(evaluate(&strategy(vec![or]), &signal, &quiet));
    }

    #[test]
    fn first_match_returns_triggering_rule() {
        let s = strategy(vec![
            cmp(Expression::Price, ComparisonOp::Lt, lit(1.0)),
            cmp(Expression::Price, ComparisonOp::Gt, lit(1.0)),
            cmp(Expression::Price, ComparisonOp::Gt, lit(0.0)),
        ]);
        let rule = first_match(&s, &Signal::default(), &market(5.0, 0.0, vec![])).unwrap();
        assert!(std::ptr::eq(rule, &s.rules[1]));
    }

    #[test]
    fn indicators_use_price_history() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let s = strategy(vec![cmp(
            Expression::Price,
            ComparisonOp::Gt,
            Expression::Sma { period: 3 },
        )]);
        assert!(evaluate(&s, &Signal::default(), &market(4.5, 0.0, prices.clone())));
        assert!(!evaluate(&s, &Signal::default(), &market(3.5, 0.0, prices)));
    }

    #[test]
    fn indicator_fallbacks_participate_in_comparisons() {
        let rsi_neutral = strategy(vec![cmp(
            Expression::Rsi { period: 14 },
            ComparisonOp::Eq,
            lit(50.0),
        )]);
        assert!(evaluate(&rsi_neutral, &Signal::default(), &MarketData::default()));

        let sma_zero = strategy(vec![cmp(
            Expression::Sma { period: 50 },
            ComparisonOp::Eq,
            lit(0.0),
        )]);
        assert!(evaluate(&sma_zero, &Signal::default(), &market(1.0, 0.0, vec![1.0; 49])));
    }

    #[test]
    fn all_operators() {
        let five = Value::Number(5.0);
        let six = Value::Number(6.0);
        assert!(compare(six, ComparisonOp::Gt, five));
        assert!(compare(five, ComparisonOp::Lt, six));
        assert!(compare(five, ComparisonOp::Ge, five));
        assert!(compare(five, ComparisonOp::Le, five));
        assert!(compare(five, ComparisonOp::Eq, Value::Number(5.0 + 1e-12)));
        assert!(!compare(five, ComparisonOp::Eq, six));
    }

    #[test]
    fn equality_tolerance_is_relative() {
        let zero = Value::Number(0.0);
        assert!(!compare(zero, ComparisonOp::Eq, Value::Number(1e-10)));
        assert!(compare(zero, ComparisonOp::Eq, Value::Number(0.0)));
        assert!(compare(
            Value::Number(0.1 + 0.2),
            ComparisonOp::Eq,
            Value::Number(0.3)
        ));
        assert!(compare(
            Value::Number(1e12),
            ComparisonOp::Eq,
            Value::Number(1e12 + 1e-4)
        ));
    }

    #[test]
    fn booleans_coerce_in_comparisons() {
        assert!(compare(Value::Bool(true), ComparisonOp::Eq, Value::Number(1.0)));
        assert!(compare(Value::Bool(false), ComparisonOp::Lt, Value::Bool(true)));
    }

    #[test]
    fn nan_never_compares() {
        let nan = Value::Number(f64::NAN);
        assert!(!compare(nan, ComparisonOp::Eq, nan));
        assert!(!compare(nan, ComparisonOp::Gt, Value::Number(0.0)));
    }

    #[test]
    fn bare_number_truthiness() {
        let s = strategy(vec![Condition::FunctionCall {
            expression: Expression::Price,
        }]);
        assert!(evaluate(&s, &Signal::default(), &market(2.0, 0.0, vec![])));
        assert!(!evaluate(&s, &Signal::default(), &market(0.0, 0.0, vec![])));
    }

    #[test]
    fn expired_deadline_stops_evaluation() {
        let s = strategy(vec![moon()]);
        let deadline = Deadline::after(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(2));
        let err = evaluate_within(&s, &Signal::new("moon"), &MarketData::default(), &deadline)
            .unwrap_err();
        assert!(matches!(err, SandboxError::ExecutionTimeout { .. }));
    }

    #[test]
    fn cancelled_deadline_stops_evaluation() {
        let s = strategy(vec![moon()]);
        let deadline = Deadline::after(Duration::from_secs(60));
        deadline.cancel();
        assert!(evaluate_within(&s, &Signal::new("moon"), &MarketData::default(), &deadline).is_err());
    }
}
