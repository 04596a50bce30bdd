//! Plan execution.
//!
//! This is the imperative shell around the pure model: a `PlanExecutor`
//! replays explored paths on `Driver` sessions, checks state assertions,
//! and folds what was exercised into a `CoverageRecord`. All results are
//! collected into a `SessionReport`; nothing here panics on test failure.

mod config;
mod coverage;
mod driver;
mod executor;
mod report;

pub use config::{ConfigError, ExecutorConfig, DEFAULT_STEP_TIMEOUT_MS};
pub use coverage::{CoverageRecord, CoverageReport};
pub use driver::{Driver, DriverError, DriverFactory};
pub use executor::{PathRun, PlanExecutor, PlanRun};
pub use report::{ExecutionError, PathOutcome, SessionReport};
