//! Executor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default per-step timeout, matching a typical end-to-end test budget.
pub const DEFAULT_STEP_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid executor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("step_timeout_ms must be at least 1")]
    ZeroTimeout,
}

/// How plans are executed.
///
/// Can be built fluently or loaded from JSON; missing fields take their
/// defaults.
///
/// # Example
///
/// ```rust
/// use pathwise::exec::ExecutorConfig;
/// use std::time::Duration;
///
/// let config = ExecutorConfig::from_json(r#"{ "max_concurrency": 4 }"#).unwrap();
/// assert_eq!(config.max_concurrency, 4);
/// assert_eq!(config.step_timeout(), Duration::from_secs(10));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Upper bound for a single driver call, in milliseconds
    pub step_timeout_ms: u64,
    /// Also verify every state a path passes through, not just its
    /// destination
    pub verify_intermediate_states: bool,
    /// Number of paths executed at the same time
    pub max_concurrency: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout_ms: DEFAULT_STEP_TIMEOUT_MS,
            verify_intermediate_states: false,
            max_concurrency: 1,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.step_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    pub fn with_intermediate_verification(mut self, enabled: bool) -> Self {
        self.verify_intermediate_states = enabled;
        self
    }

    /// Values below 1 are raised to 1.
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }
}
