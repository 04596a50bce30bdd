//! Execution outcomes and session reports.

use crate::builder::ModelError;
use crate::core::StateId;
use crate::exec::coverage::CoverageReport;
use crate::exec::driver::DriverError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Why a path execution stopped early.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("Failed to start driver session: {0}")]
    Launch(DriverError),

    #[error("Step {index} ({event}) failed: {cause}")]
    Step {
        index: usize,
        event: String,
        #[source]
        cause: DriverError,
    },

    #[error("Step {index} ({event}) timed out after {timeout_ms}ms")]
    StepTimeout {
        index: usize,
        event: String,
        timeout_ms: u64,
    },

    #[error("State '{state}' did not match: {cause}")]
    Assertion {
        state: StateId,
        expectation: Option<String>,
        #[source]
        cause: DriverError,
    },

    #[error("Assertion for state '{state}' timed out after {timeout_ms}ms")]
    AssertionTimeout { state: StateId, timeout_ms: u64 },

    #[error("Step {index} diverged from the model: recorded '{recorded}', model resolves '{resolved}'")]
    Divergence {
        index: usize,
        recorded: StateId,
        resolved: StateId,
    },

    #[error("Model rejected step {index}: {cause}")]
    Model {
        index: usize,
        #[source]
        cause: ModelError,
    },
}

/// Result of executing one path.
#[derive(Clone, Debug, Serialize)]
pub struct PathOutcome {
    /// Description of the plan the path belongs to
    pub plan: String,
    /// Description of the path itself
    pub path: String,
    pub destination: StateId,
    pub steps_total: usize,
    pub steps_completed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(serialize_with = "error_message")]
    pub error: Option<ExecutionError>,
}

impl PathOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    pub fn duration(&self) -> Duration {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "ok   {} / {}", self.plan, self.path),
            Some(error) => write!(f, "FAIL {} / {}: {}", self.plan, self.path, error),
        }
    }
}

fn error_message<S: Serializer>(
    error: &Option<ExecutionError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Everything a test session produced: one outcome per executed path, in
/// plan order, and the merged coverage verdict.
#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub id: Uuid,
    pub workflow: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<PathOutcome>,
    pub coverage: CoverageReport,
}

impl SessionReport {
    /// Whether every executed path passed. Coverage is judged separately.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(PathOutcome::passed)
    }

    pub fn coverage_complete(&self) -> bool {
        self.coverage.complete
    }

    pub fn failures(&self) -> impl Iterator<Item = &PathOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "session {} ({})", self.id, self.workflow)?;
        for outcome in &self.outcomes {
            writeln!(f, "  {outcome}")?;
        }
        writeln!(
            f,
            "{} passed, {} failed",
            self.passed_count(),
            self.failed_count()
        )?;
        write!(f, "coverage: {}", self.coverage)
    }
}
