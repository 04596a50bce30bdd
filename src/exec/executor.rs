//! Replays plans against drivers and accumulates coverage.

use crate::core::{Event, StateId};
use crate::exec::config::ExecutorConfig;
use crate::exec::coverage::CoverageRecord;
use crate::exec::driver::{Driver, DriverFactory};
use crate::exec::report::{ExecutionError, PathOutcome, SessionReport};
use crate::explore::plan::describe_destination;
use crate::explore::{Path, Plan};
use crate::model::Workflow;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcome of one path plus the coverage it handed back.
#[derive(Clone, Debug)]
pub struct PathRun {
    pub outcome: PathOutcome,
    pub coverage: CoverageRecord,
}

/// Outcomes of every path of one plan.
#[derive(Clone, Debug)]
pub struct PlanRun {
    pub description: String,
    pub outcomes: Vec<PathOutcome>,
    pub coverage: CoverageRecord,
}

impl PlanRun {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(PathOutcome::passed)
    }
}

/// Executes paths against drivers.
///
/// Steps of one path run strictly in order, each awaited before the next.
/// Paths are independent: each gets its own driver session and its own
/// coverage record, so a failing path never affects another.
pub struct PlanExecutor<'w, C, E> {
    workflow: &'w Workflow<C, E>,
    config: ExecutorConfig,
}

impl<'w, C, E: Event> PlanExecutor<'w, C, E> {
    pub fn new(workflow: &'w Workflow<C, E>, config: ExecutorConfig) -> Self {
        Self { workflow, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Replay `path` on `driver`, then verify the destination.
    ///
    /// `coverage` is extended with every state reached and transition
    /// taken, and returned in the run whether the path passed or not.
    pub async fn execute_path<D: Driver<E>>(
        &self,
        path: &Path<E>,
        driver: &mut D,
        coverage: CoverageRecord,
    ) -> PathRun {
        let started_at = Utc::now();
        let mut coverage = coverage;
        let mut completed = 0;

        let result = self
            .replay(path, driver, &mut coverage, &mut completed)
            .await;

        let outcome = PathOutcome {
            plan: describe_destination(path.destination()),
            path: path.description(),
            destination: path.destination().clone(),
            steps_total: path.len(),
            steps_completed: completed,
            started_at,
            finished_at: Utc::now(),
            error: result.err(),
        };

        match &outcome.error {
            None => debug!(path = %outcome.path, "path passed"),
            Some(error) => warn!(path = %outcome.path, %error, "path failed"),
        }

        PathRun { outcome, coverage }
    }

    async fn replay<D: Driver<E>>(
        &self,
        path: &Path<E>,
        driver: &mut D,
        coverage: &mut CoverageRecord,
        completed: &mut usize,
    ) -> Result<(), ExecutionError> {
        let mut current = path.start().clone();
        if &current != self.workflow.initial() {
            return Err(ExecutionError::Divergence {
                index: 0,
                recorded: current,
                resolved: self.workflow.initial().clone(),
            });
        }

        for (index, step) in path.steps().iter().enumerate() {
            if self.config.verify_intermediate_states {
                self.verify(&current, driver).await?;
            }
            coverage.mark_state(&current);

            let resolution = self
                .workflow
                .transition(&current, &step.event)
                .map_err(|cause| ExecutionError::Model { index, cause })?;
            if resolution.target != step.target {
                return Err(ExecutionError::Divergence {
                    index,
                    recorded: step.target.clone(),
                    resolved: resolution.target,
                });
            }

            debug!(index, event = %step.event.label(), from = %current, "dispatching");
            match timeout(self.config.step_timeout(), driver.dispatch(&step.event)).await {
                Err(_) => {
                    return Err(ExecutionError::StepTimeout {
                        index,
                        event: step.event.label(),
                        timeout_ms: self.config.step_timeout_ms,
                    })
                }
                Ok(Err(cause)) => {
                    return Err(ExecutionError::Step {
                        index,
                        event: step.event.label(),
                        cause,
                    })
                }
                Ok(Ok(())) => {}
            }

            coverage.mark_transition(&step.transition);
            *completed += 1;
            current = step.target.clone();
        }

        self.verify(&current, driver).await?;
        coverage.mark_state(&current);
        Ok(())
    }

    /// Run the assertions of `state` and its ancestors, outermost first.
    async fn verify<D: Driver<E>>(
        &self,
        state: &StateId,
        driver: &mut D,
    ) -> Result<(), ExecutionError> {
        let mut lineage = self.workflow.ancestors(state);
        lineage.reverse();

        for node in lineage.into_iter().filter(|node| node.has_assertion()) {
            match timeout(self.config.step_timeout(), driver.verify(node)).await {
                Err(_) => {
                    return Err(ExecutionError::AssertionTimeout {
                        state: node.id().clone(),
                        timeout_ms: self.config.step_timeout_ms,
                    })
                }
                Ok(Err(cause)) => {
                    return Err(ExecutionError::Assertion {
                        state: node.id().clone(),
                        expectation: node.expectation().map(str::to_string),
                        cause,
                    })
                }
                Ok(Ok(())) => {}
            }
        }
        Ok(())
    }

    /// Launch a fresh driver and execute `path` on it.
    pub async fn launch_path<F: DriverFactory<E>>(&self, path: &Path<E>, factory: &F) -> PathRun {
        match factory.launch().await {
            Ok(mut driver) => {
                self.execute_path(path, &mut driver, CoverageRecord::new())
                    .await
            }
            Err(cause) => {
                warn!(path = %path.description(), %cause, "driver launch failed");
                let now = Utc::now();
                PathRun {
                    outcome: PathOutcome {
                        plan: describe_destination(path.destination()),
                        path: path.description(),
                        destination: path.destination().clone(),
                        steps_total: path.len(),
                        steps_completed: 0,
                        started_at: now,
                        finished_at: now,
                        error: Some(ExecutionError::Launch(cause)),
                    },
                    coverage: CoverageRecord::new(),
                }
            }
        }
    }

    /// Execute every path of `plan`, one fresh driver each, in order.
    pub async fn execute_plan<F: DriverFactory<E>>(&self, plan: &Plan<E>, factory: &F) -> PlanRun {
        let mut outcomes = Vec::with_capacity(plan.paths().len());
        let mut coverage = CoverageRecord::new();

        for path in plan.paths() {
            let run = self.launch_path(path, factory).await;
            outcomes.push(run.outcome);
            coverage = coverage.merge(run.coverage);
        }

        PlanRun {
            description: plan.description(),
            outcomes,
            coverage,
        }
    }

    /// Execute every path of every plan and judge coverage.
    ///
    /// Up to `max_concurrency` paths run at once. Outcomes are reported in
    /// plan order regardless of completion order.
    pub async fn execute_all<F: DriverFactory<E>>(
        &self,
        plans: &[Plan<E>],
        factory: &F,
    ) -> SessionReport {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        let paths: Vec<&Path<E>> = plans.iter().flat_map(|plan| plan.paths()).collect();

        info!(
            session = %id,
            workflow = %self.workflow.id(),
            plans = plans.len(),
            paths = paths.len(),
            concurrency = self.config.max_concurrency,
            "starting test session"
        );

        let mut runs: Vec<(usize, PathRun)> = stream::iter(paths.into_iter().enumerate())
            .map(|(index, path)| async move { (index, self.launch_path(path, factory).await) })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;
        runs.sort_by_key(|(index, _)| *index);

        let (outcomes, records): (Vec<_>, Vec<_>) = runs
            .into_iter()
            .map(|(_, run)| (run.outcome, run.coverage))
            .unzip();
        let coverage = records
            .into_iter()
            .collect::<CoverageRecord>()
            .report(self.workflow);

        let report = SessionReport {
            id,
            workflow: self.workflow.id().to_string(),
            started_at,
            finished_at: Utc::now(),
            outcomes,
            coverage,
        };

        info!(
            session = %id,
            passed = report.passed_count(),
            failed = report.failed_count(),
            coverage_complete = report.coverage.complete,
            transitions_complete = report.coverage.transitions_complete,
            "test session finished"
        );
        if !report.coverage.complete {
            warn!(session = %id, coverage = %report.coverage, "coverage incomplete");
        } else if !report.coverage.transitions_complete {
            debug!(session = %id, coverage = %report.coverage, "transitions left untaken");
        }
        report
    }
}
