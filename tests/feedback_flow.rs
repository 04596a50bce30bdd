//! End-to-end tests over the feedback widget workflow.
//!
//! The widget asks a question, shows a form on a bad answer and thanks the
//! user afterwards. ESC closes it from anywhere. Submitting an empty form
//! still thanks the user, which the model records as an unguarded fallback.

use async_trait::async_trait;
use pathwise::builder::{StateBuilder, WorkflowBuilder};
use pathwise::core::{Candidate, Event, StateId, StateNode};
use pathwise::event_enum;
use pathwise::exec::{Driver, DriverError, ExecutionError, ExecutorConfig, PlanExecutor};
use pathwise::explore::PathExplorer;
use pathwise::model::Workflow;
use std::time::Duration;

event_enum! {
    pub enum Feedback {
        Good => "CLICK_GOOD",
        Bad => "CLICK_BAD",
        Close => "CLOSE",
        Esc => "ESC",
        Focus => "FOCUS",
        Submit { value: String } => "SUBMIT",
    }
}

fn submit(value: &str) -> Feedback {
    Feedback::Submit {
        value: value.to_string(),
    }
}

fn events() -> Vec<Feedback> {
    vec![
        Feedback::Good,
        Feedback::Bad,
        Feedback::Close,
        Feedback::Esc,
        submit("something"),
        submit(""),
    ]
}

fn feedback() -> Workflow<(), Feedback> {
    WorkflowBuilder::new("feedback")
        .initial("question")
        .on("ESC", "closed")
        .state(
            StateBuilder::new("question")
                .on("CLICK_GOOD", "thanks")
                .on("CLICK_BAD", "form")
                .on("CLOSE", "closed")
                .expectation("How was your experience?"),
        )
        .state(
            StateBuilder::new("form")
                .on_candidates(
                    "SUBMIT",
                    vec![Candidate::when("hasText", "thanks"), Candidate::to("thanks")],
                )
                .on("CLOSE", "closed")
                .expectation("Care to tell us why?"),
        )
        .state(
            StateBuilder::new("thanks")
                .on("CLOSE", "closed")
                .expectation("Thanks for your feedback."),
        )
        .state(
            StateBuilder::new("closed")
                .final_state()
                .expectation("No feedback screen is shown"),
        )
        .guard("hasText", |_: &(), event: &Feedback| {
            matches!(event, Feedback::Submit { value } if !value.is_empty())
        })
        .build()
        .unwrap()
}

/// The widget with its form split into pending, invalid and submitted
/// screens. `invalid --FOCUS--> pending` closes a cycle.
fn nested_feedback() -> Workflow<(), Feedback> {
    WorkflowBuilder::new("feedback")
        .initial("question")
        .state(
            StateBuilder::new("question")
                .on("CLICK_GOOD", "acknowledge")
                .on("CLICK_BAD", "form")
                .on("CLOSE", "closed")
                .on("ESC", "closed"),
        )
        .state(
            StateBuilder::new("form")
                .initial("pending")
                .child(StateBuilder::new("pending").on_candidates(
                    "SUBMIT",
                    vec![Candidate::when("hasText", "submitted"), Candidate::to("invalid")],
                ))
                .child(StateBuilder::new("invalid").on("FOCUS", "pending"))
                .child(StateBuilder::new("submitted"))
                .on("CLOSE", "closed")
                .on("ESC", "closed"),
        )
        .state(
            StateBuilder::new("acknowledge")
                .on("CLOSE", "closed")
                .on("ESC", "closed"),
        )
        .state(StateBuilder::new("closed").final_state())
        .guard("hasText", |_: &(), event: &Feedback| {
            matches!(event, Feedback::Submit { value } if !value.is_empty())
        })
        .build()
        .unwrap()
}

/// Accepts every action and every assertion.
struct Accepting;

#[async_trait]
impl Driver<Feedback> for Accepting {
    async fn dispatch(&mut self, _event: &Feedback) -> Result<(), DriverError> {
        Ok(())
    }

    async fn verify(&mut self, _state: &StateNode) -> Result<(), DriverError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Screen {
    #[default]
    Question,
    Form,
    Thanks,
    Closed,
}

/// In-memory stand-in for the rendered widget.
#[derive(Default)]
struct Widget {
    screen: Screen,
    input: String,
    submit_missing: bool,
    ignores_empty_submit: bool,
    delay: Option<Duration>,
}

#[async_trait]
impl Driver<Feedback> for Widget {
    async fn dispatch(&mut self, event: &Feedback) -> Result<(), DriverError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match (event, self.screen) {
            (Feedback::Good, Screen::Question) => self.screen = Screen::Thanks,
            (Feedback::Bad, Screen::Question) => self.screen = Screen::Form,
            (Feedback::Close, Screen::Question | Screen::Form | Screen::Thanks) => {
                self.screen = Screen::Closed
            }
            (Feedback::Esc, _) => self.screen = Screen::Closed,
            (Feedback::Submit { value }, Screen::Form) => {
                if self.submit_missing {
                    return Err(DriverError::ElementNotFound(
                        "[data-testid=submit-button]".into(),
                    ));
                }
                self.input.push_str(value);
                if !(self.ignores_empty_submit && self.input.is_empty()) {
                    self.screen = Screen::Thanks;
                }
            }
            (event, screen) => {
                return Err(DriverError::ActionFailed(format!(
                    "{} is not available on {screen:?}",
                    event.name()
                )))
            }
        }
        Ok(())
    }

    async fn verify(&mut self, state: &StateNode) -> Result<(), DriverError> {
        let expected = match state.key() {
            "question" => Screen::Question,
            "form" => Screen::Form,
            "thanks" => Screen::Thanks,
            "closed" => Screen::Closed,
            other => return Err(DriverError::AssertionFailed(format!("no screen for {other}"))),
        };
        if self.screen != expected {
            return Err(DriverError::AssertionFailed(format!(
                "expected '{}', found {:?}",
                state.expectation().unwrap_or_default(),
                self.screen
            )));
        }
        Ok(())
    }
}

#[test]
fn three_paths_reach_thanks() {
    let workflow = feedback();
    let paths = PathExplorer::new(&workflow, events()).simple_paths();

    let descriptions: Vec<String> = paths[&StateId::new("thanks")]
        .iter()
        .map(|path| path.description())
        .collect();

    assert_eq!(
        descriptions,
        vec![
            "via CLICK_GOOD",
            r#"via CLICK_BAD → SUBMIT {"value":"something"}"#,
            r#"via CLICK_BAD → SUBMIT {"value":""}"#,
        ]
    );
}

#[test]
fn plans_follow_declaration_order() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();

    let summary: Vec<(String, usize)> = plans
        .iter()
        .map(|plan| (plan.description(), plan.paths().len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("reaches state: question".to_string(), 1),
            ("reaches state: form".to_string(), 1),
            ("reaches state: thanks".to_string(), 3),
            ("reaches state: closed".to_string(), 10),
        ]
    );
    assert_eq!(plans[0].paths()[0].description(), "via initial state");
    assert_eq!(plans[1].paths()[0].description(), "via CLICK_BAD");
    assert_eq!(plans[2].expectation(), Some("Thanks for your feedback."));
}

#[test]
fn closed_is_reachable_through_every_state() {
    let workflow = feedback();
    let paths = PathExplorer::new(&workflow, events()).simple_paths();
    let to_closed = &paths[&StateId::new("closed")];

    for node in workflow.leaves().filter(|node| !node.is_final()) {
        assert!(
            to_closed
                .iter()
                .any(|path| path.states().contains(&node.id())),
            "no path to closed passes through {}",
            node.id()
        );
    }
    assert!(to_closed.iter().all(|path| !path.has_repeated_state()));
}

#[test]
fn submit_falls_back_when_guard_fails() {
    let workflow = feedback();
    let form = StateId::new("form");

    let with_text = workflow.transition(&form, &submit("something")).unwrap();
    let empty = workflow.transition(&form, &submit("")).unwrap();

    assert_eq!(with_text.target, StateId::new("thanks"));
    assert_eq!(empty.target, StateId::new("thanks"));
    assert_eq!(with_text.transition.unwrap().index, 0);
    assert_eq!(empty.transition.unwrap().index, 1);
}

#[test]
fn unmatched_and_final_events_are_noops() {
    let workflow = feedback();

    let question = workflow
        .transition(&StateId::new("question"), &submit("x"))
        .unwrap();
    assert!(question.is_noop());
    assert_eq!(question.target, StateId::new("question"));

    let closed = workflow
        .transition(&StateId::new("closed"), &Feedback::Esc)
        .unwrap();
    assert!(closed.is_noop());
}

#[test]
fn esc_is_inherited_from_the_root() {
    let workflow = feedback();
    let resolution = workflow
        .transition(&StateId::new("thanks"), &Feedback::Esc)
        .unwrap();

    assert_eq!(resolution.target, StateId::new("closed"));
    assert_eq!(resolution.transition.unwrap().source, None);
}

#[test]
fn exploration_is_deterministic() {
    let workflow = feedback();
    let explorer = PathExplorer::new(&workflow, events());

    assert_eq!(explorer.simple_path_plans(), explorer.simple_path_plans());
    assert_eq!(explorer.shortest_path_plans(), explorer.shortest_path_plans());
}

#[tokio::test]
async fn correct_widget_passes_with_full_coverage() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();
    let executor = PlanExecutor::new(&workflow, ExecutorConfig::default());

    let report = executor.execute_all(&plans, &Widget::default).await;

    assert!(report.passed(), "{report}");
    assert_eq!(report.outcomes.len(), 15);
    assert!(report.coverage_complete(), "{}", report.coverage);
    assert!(report.coverage.transitions_complete);
    assert_eq!(report.coverage.states_total, 4);
    assert_eq!(report.coverage.transitions_total, 8);
}

#[tokio::test]
async fn cyclic_workflow_reaches_complete_state_coverage() {
    let workflow = nested_feedback();
    let mut events = events();
    events.push(Feedback::Focus);
    let plans = PathExplorer::new(&workflow, events).simple_path_plans();
    let executor = PlanExecutor::new(&workflow, ExecutorConfig::default());

    let report = executor.execute_all(&plans, &|| Accepting).await;

    assert!(report.passed(), "{report}");
    assert!(report.coverage_complete(), "{}", report.coverage);
    assert_eq!(report.coverage.states_covered, 7);
    assert_eq!(report.coverage.states_total, 7);

    assert!(!report.coverage.transitions_complete);
    assert_eq!(report.coverage.missing_transitions.len(), 1);
    let back_edge = &report.coverage.missing_transitions[0];
    assert_eq!(back_edge.event, "FOCUS");
    assert_eq!(back_edge.source, Some(StateId::new("form.invalid")));
    assert_eq!(back_edge.target, StateId::new("form.pending"));
}

#[tokio::test]
async fn missing_submit_button_fails_only_submit_paths() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();
    let executor = PlanExecutor::new(&workflow, ExecutorConfig::default());
    let factory = || Widget {
        submit_missing: true,
        ..Widget::default()
    };

    let report = executor.execute_all(&plans, &factory).await;

    assert_eq!(report.failed_count(), 6);
    assert_eq!(report.passed_count(), 9);
    for failure in report.failures() {
        assert!(matches!(
            &failure.error,
            Some(ExecutionError::Step { index: 1, event, .. }) if event.starts_with("SUBMIT")
        ));
        assert_eq!(failure.steps_completed, 1);
    }

    assert!(report.coverage_complete());
    assert!(!report.coverage.transitions_complete);
    assert!(report.coverage.missing_states.is_empty());
    assert_eq!(report.coverage.missing_transitions.len(), 2);
    assert!(report
        .coverage
        .missing_transitions
        .iter()
        .all(|id| id.event == "SUBMIT"));
}

#[tokio::test]
async fn intermediate_verification_catches_silent_divergence() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();
    let factory = || Widget {
        ignores_empty_submit: true,
        ..Widget::default()
    };

    let lenient = PlanExecutor::new(&workflow, ExecutorConfig::default())
        .execute_all(&plans, &factory)
        .await;
    let strict = PlanExecutor::new(
        &workflow,
        ExecutorConfig::default().with_intermediate_verification(true),
    )
    .execute_all(&plans, &factory)
    .await;

    assert_eq!(lenient.failed_count(), 1);
    assert_eq!(strict.failed_count(), 3);
    assert!(strict.failures().all(|outcome| matches!(
        &outcome.error,
        Some(ExecutionError::Assertion { state, .. }) if state == "thanks"
    )));
}

#[tokio::test]
async fn slow_widget_times_out() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).shortest_path_plans();
    let config = ExecutorConfig::default().with_step_timeout(Duration::from_millis(10));
    let factory = || Widget {
        delay: Some(Duration::from_millis(500)),
        ..Widget::default()
    };

    let report = PlanExecutor::new(&workflow, config)
        .execute_all(&plans, &factory)
        .await;

    assert_eq!(report.outcomes.len(), 4);
    assert!(report.outcomes[0].passed());
    assert_eq!(report.failed_count(), 3);
    assert!(report.failures().all(|outcome| matches!(
        outcome.error,
        Some(ExecutionError::StepTimeout { index: 0, timeout_ms: 10, .. })
    )));
}

#[tokio::test]
async fn concurrency_does_not_change_results() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();
    let factory = || Widget {
        submit_missing: true,
        ..Widget::default()
    };

    let sequential = PlanExecutor::new(&workflow, ExecutorConfig::default())
        .execute_all(&plans, &factory)
        .await;
    let concurrent = PlanExecutor::new(&workflow, ExecutorConfig::default().with_max_concurrency(4))
        .execute_all(&plans, &factory)
        .await;

    let summarize = |report: &pathwise::SessionReport| -> Vec<(String, bool)> {
        report
            .outcomes
            .iter()
            .map(|outcome| (outcome.path.clone(), outcome.passed()))
            .collect()
    };
    assert_eq!(summarize(&sequential), summarize(&concurrent));
    assert_eq!(sequential.coverage, concurrent.coverage);
}

#[tokio::test]
async fn plan_execution_and_json_report() {
    let workflow = feedback();
    let plans = PathExplorer::new(&workflow, events()).simple_path_plans();
    let executor = PlanExecutor::new(&workflow, ExecutorConfig::default());

    let run = executor.execute_plan(&plans[2], &Widget::default).await;
    assert!(run.passed());
    assert_eq!(run.description, "reaches state: thanks");
    assert_eq!(run.outcomes.len(), 3);
    assert!(run.coverage.covers_state(&StateId::new("thanks")));

    let report = executor.execute_all(&plans[..1], &Widget::default).await;
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["workflow"], "feedback");
    assert_eq!(json["outcomes"][0]["plan"], "reaches state: question");
    assert_eq!(json["outcomes"][0]["error"], serde_json::Value::Null);
}
