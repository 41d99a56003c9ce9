//! Domain error types.

/// A strategy syntax error.
///
/// The parsers do not track source positions, so `line` and `column` are
/// always 1. Callers should rely on `message`, which names the offending
/// clause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: 1,
            column: 1,
            message: message.into(),
        }
    }
}

/// Rejections raised by the sandbox while validating or running an AST.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    #[error("maximum AST depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },

    #[error("disallowed operation: {0}")]
    DisallowedOperation(String),

    #[error("potentially dangerous pattern detected: {0}")]
    DangerousPatternDetected(String),

    #[error("execution exceeded {timeout_ms} ms")]
    ExecutionTimeout { timeout_ms: u64 },

    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error("invalid AST: {0}")]
    InvalidAst(String),
}

/// Top-level error type for stratlang.
#[derive(Debug, thiserror::Error)]
pub enum StratError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error: {reason}")]
    MarketData { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratError> for std::process::ExitCode {
    fn from(err: &StratError) -> Self {
        let code: u8 = match err {
            StratError::Io(_) | StratError::Json(_) => 1,
            StratError::ConfigParse { .. } | StratError::ConfigInvalid { .. } => 2,
            StratError::MarketData { .. } => 3,
            StratError::Syntax(_) => 4,
            StratError::Sandbox(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
