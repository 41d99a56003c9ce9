//! Safety layer for untrusted strategy ASTs.
//!
//! Works on the JSON form of an AST so that trees built by any caller,
//! including ones carrying tags the typed AST cannot express, can be checked:
//!
//! 1. Structural walk: depth limit and a whitelist of node tags.
//! 2. Content scan: coarse substring check of the serialised tree against
//!    names tied to code loading, file-system access and process spawning.
//!    False positives on legitimate text are possible.
//! 3. Timed execution: the evaluation runs on a worker thread against a
//!    [`Deadline`]. When the budget runs out the caller gets
//!    `ExecutionTimeout` and the deadline is cancelled so a cooperating
//!    evaluation stops at its next check.

use crate::domain::error::SandboxError;
use crate::domain::evaluator;
use crate::domain::market::{MarketData, Signal};
use crate::domain::rule::Rule;
use crate::domain::sandbox_config::SandboxConfig;
use crate::domain::strategy::Strategy;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

pub const ALLOWED_OPERATIONS: &[&str] = &[
    "and",
    "or",
    "comparison",
    "function",
    "tweet.contains",
    "token.volume",
    "price",
    "rsi",
    "sma",
    "ema",
    "literal",
    "buy",
    "sell",
];

pub const DANGEROUS_PATTERNS: &[&str] = &[
    "require",
    "import",
    "eval",
    "Function",
    "fs",
    "process",
    "child_process",
];

const CHILD_NODES: &[&str] = &["left", "right", "expression", "condition"];
const CHILD_LISTS: &[&str] = &["rules", "actions", "conditions"];

/// Expiry instant plus a shared cancellation flag.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Option<Instant>,
    timeout_ms: u64,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    pub fn unbounded() -> Self {
        Self {
            expires_at: None,
            timeout_ms: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(timeout),
            timeout_ms: timeout.as_millis() as u64,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_expired(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn check(&self) -> Result<(), SandboxError> {
        if self.is_expired() {
            return Err(SandboxError::ExecutionTimeout {
                timeout_ms: self.timeout_ms,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    config: SandboxConfig,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Structural walk followed by the content scan.
    pub fn validate(&self, ast: &Value) -> Result<(), SandboxError> {
        self.check_structure(ast, 0)
            .and_then(|_| scan_content(ast))
            .inspect_err(|err| tracing::warn!(%err, "sandbox rejected AST"))
    }

    /// Validates every rule condition and action as its own root, then scans
    /// the whole strategy, name included.
    pub fn validate_strategy(&self, strategy: &Strategy) -> Result<(), SandboxError> {
        let tree =
            serde_json::to_value(strategy).map_err(|e| SandboxError::InvalidAst(e.to_string()))?;

        let result = (|| {
            for rule in tree.get("rules").and_then(Value::as_array).into_iter().flatten() {
                if let Some(condition) = rule.get("condition") {
                    self.check_structure(condition, 0)?;
                }
                for action in rule.get("actions").and_then(Value::as_array).into_iter().flatten() {
                    self.check_structure(action, 0)?;
                }
            }
            scan_content(&tree)
        })();

        result.inspect_err(|err| {
            tracing::warn!(strategy = %strategy.name, %err, "sandbox rejected strategy")
        })
    }

    /// Validates `ast`, then runs `run` under the configured deadline.
    ///
    /// `run` receives the deadline and should check it regularly; once the
    /// budget is spent the caller receives `ExecutionTimeout` whether or not
    /// `run` cooperates.
    pub fn execute<T, F>(&self, ast: &Value, run: F) -> Result<T, SandboxError>
    where
        T: Send + 'static,
        F: FnOnce(&Deadline) -> Result<T, SandboxError> + Send + 'static,
    {
        self.validate(ast)?;
        self.run_timed(run)
    }

    /// Validates the strategy and evaluates it under the configured deadline,
    /// returning the rule that fired, if any.
    pub fn evaluate_strategy(
        &self,
        strategy: &Strategy,
        signal: &Signal,
        market: &MarketData,
    ) -> Result<Option<Rule>, SandboxError> {
        self.validate_strategy(strategy)?;

        let strategy = strategy.clone();
        let signal = signal.clone();
        let market = market.clone();
        self.run_timed(move |deadline| {
            evaluator::first_match_within(&strategy, &signal, &market, deadline)
                .map(|rule| rule.cloned())
        })
    }

    fn run_timed<T, F>(&self, run: F) -> Result<T, SandboxError>
    where
        T: Send + 'static,
        F: FnOnce(&Deadline) -> Result<T, SandboxError> + Send + 'static,
    {
        let deadline = Deadline::after(self.config.timeout);
        let worker_deadline = deadline.clone();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("sandbox-eval".into())
            .spawn(move || {
                // the receiver is gone once the caller has timed out
                let _ = tx.send(run(&worker_deadline));
            })
            .map_err(|e| SandboxError::ExecutionFailed(e.to_string()))?;

        match rx.recv_timeout(self.config.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                deadline.cancel();
                tracing::warn!(
                    timeout_ms = self.config.timeout_ms(),
                    "sandboxed evaluation timed out"
                );
                Err(SandboxError::ExecutionTimeout {
                    timeout_ms: self.config.timeout_ms(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SandboxError::ExecutionFailed(
                "evaluation worker terminated without a result".into(),
            )),
        }
    }

    fn check_structure(&self, node: &Value, depth: usize) -> Result<(), SandboxError> {
        if depth > self.config.max_depth {
            return Err(SandboxError::MaxDepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let Value::Object(fields) = node else {
            return Ok(());
        };

        match fields.get("type") {
            None => {}
            Some(Value::String(tag)) if ALLOWED_OPERATIONS.contains(&tag.as_str()) => {}
            Some(Value::String(tag)) => {
                return Err(SandboxError::DisallowedOperation(tag.clone()));
            }
            Some(other) => return Err(SandboxError::DisallowedOperation(other.to_string())),
        }

        for key in CHILD_NODES {
            if let Some(child) = fields.get(*key) {
                self.check_structure(child, depth + 1)?;
            }
        }
        for key in CHILD_LISTS {
            if let Some(Value::Array(children)) = fields.get(*key) {
                for child in children {
                    self.check_structure(child, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

fn scan_content(node: &Value) -> Result<(), SandboxError> {
    let text = serde_json::to_string(node).map_err(|e| SandboxError::InvalidAst(e.to_string()))?;
    match DANGEROUS_PATTERNS.iter().find(|p| text.contains(*p)) {
        Some(pattern) => Err(SandboxError::DangerousPatternDetected(pattern.to_string())),
        None => Ok(()),
    }
}
