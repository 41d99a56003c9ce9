//! Sandbox limits and their `[sandbox]` configuration section.

use crate::domain::error::StratError;
use crate::ports::config_port::ConfigPort;
use std::time::Duration;

pub const SECTION: &str = "sandbox";
pub const DEFAULT_MAX_DEPTH: usize = 50;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Deepest node level accepted by structural validation, counted from 0 at the root.
    pub max_depth: usize,
    /// Wall-clock budget for a sandboxed evaluation.
    pub timeout: Duration,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl SandboxConfig {
    /// Reads `max_depth` and `timeout_ms`; missing keys keep their defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StratError> {
        let defaults = Self::default();
        let max_depth = read_positive(config, "max_depth")?
            .map(|v| v as usize)
            .unwrap_or(defaults.max_depth);
        let timeout = read_positive(config, "timeout_ms")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);
        Ok(Self { max_depth, timeout })
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

fn read_positive(config: &dyn ConfigPort, key: &str) -> Result<Option<u64>, StratError> {
    let value = config
        .get_uint(SECTION, key)
        .map_err(|reason| invalid(key, &reason))?;
    match value {
        Some(0) => Err(invalid(key, &format!("{} must be positive", key))),
        other => Ok(other),
    }
}

fn invalid(key: &str, reason: &str) -> StratError {
    StratError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
