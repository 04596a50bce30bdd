//! Feedback Widget Test Generation
//!
//! This example models a feedback widget whose form is a nested state
//! machine, generates every simple path through it and replays them against
//! an in-memory widget.
//!
//! Key concepts:
//! - Compound states entered through their initial child
//! - Guards reading extended state and event payload
//! - Payload cases as separate branches
//! - Coverage of states and transitions
//!
//! Run with: cargo run --example feedback_flow
//! Set RUST_LOG=pathwise=debug to see every dispatched step.

use async_trait::async_trait;
use pathwise::builder::{final_state, StateBuilder, WorkflowBuilder};
use pathwise::core::{Candidate, Event, StateNode};
use pathwise::event_enum;
use pathwise::exec::{Driver, DriverError, ExecutorConfig, PlanExecutor};
use pathwise::explore::PathExplorer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

event_enum! {
    enum Feedback {
        Good => "CLICK_GOOD",
        Bad => "CLICK_BAD",
        Close => "CLOSE",
        Esc => "ESC",
        Focus => "FOCUS",
        Submit { value: String } => "SUBMIT",
    }
}

/// Extended state read by the `formValid` guard.
struct FormRules {
    min_length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Screen {
    Question,
    Pending,
    Invalid,
    Submitted,
    Acknowledge,
    Closed,
}

struct Widget {
    screen: Screen,
    min_length: usize,
}

impl Widget {
    fn new() -> Self {
        Self {
            screen: Screen::Question,
            min_length: 1,
        }
    }
}

#[async_trait]
impl Driver<Feedback> for Widget {
    async fn dispatch(&mut self, event: &Feedback) -> Result<(), DriverError> {
        use Screen::*;

        self.screen = match (event, self.screen) {
            (Feedback::Good, Question) => Acknowledge,
            (Feedback::Bad, Question) => Pending,
            (Feedback::Close | Feedback::Esc, screen) if screen != Closed => Closed,
            (Feedback::Submit { value }, Pending) if value.len() >= self.min_length => Submitted,
            (Feedback::Submit { .. }, Pending) => Invalid,
            (Feedback::Focus, Invalid) => Pending,
            (event, screen) => {
                return Err(DriverError::ActionFailed(format!(
                    "{} is not available on {screen:?}",
                    event.label()
                )))
            }
        };
        Ok(())
    }

    async fn verify(&mut self, state: &StateNode) -> Result<(), DriverError> {
        use Screen::*;

        let shown = match state.id().as_str() {
            "question" => self.screen == Question,
            "form" => matches!(self.screen, Pending | Invalid | Submitted),
            "form.pending" => self.screen == Pending,
            "form.invalid" => self.screen == Invalid,
            "form.submitted" => self.screen == Submitted,
            "acknowledge" => self.screen == Acknowledge,
            "closed" => self.screen == Closed,
            _ => false,
        };
        if !shown {
            return Err(DriverError::AssertionFailed(format!(
                "{} not shown, widget is on {:?}",
                state.id(),
                self.screen
            )));
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathwise=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    println!("=== Feedback Widget Test Generation ===\n");

    let workflow = WorkflowBuilder::with_context("feedback", FormRules { min_length: 1 })
        .initial("question")
        .state(
            StateBuilder::new("question")
                .on("CLICK_GOOD", "acknowledge")
                .on("CLICK_BAD", "form")
                .on("CLOSE", "closed")
                .on("ESC", "closed")
                .expectation("How was your experience?"),
        )
        .state(
            StateBuilder::new("form")
                .initial("pending")
                .child(StateBuilder::new("pending").on_candidates(
                    "SUBMIT",
                    vec![
                        Candidate::when("formValid", "submitted"),
                        Candidate::to("invalid"),
                    ],
                ))
                .child(
                    StateBuilder::new("invalid")
                        .on("FOCUS", "pending")
                        .expectation("Please tell us why"),
                )
                .child(StateBuilder::new("submitted").expectation("Response sent"))
                .on("CLOSE", "closed")
                .on("ESC", "closed")
                .expectation("Care to tell us why?"),
        )
        .state(
            StateBuilder::new("acknowledge")
                .on("CLOSE", "closed")
                .on("ESC", "closed")
                .expectation("Thanks for your feedback."),
        )
        .state(final_state("closed").expectation("Widget dismissed"))
        .guard("formValid", |rules: &FormRules, event: &Feedback| {
            matches!(event, Feedback::Submit { value } if value.len() >= rules.min_length)
        })
        .build();

    let workflow = match workflow {
        Ok(workflow) => workflow,
        Err(error) => {
            eprintln!("{error}");
            return;
        }
    };

    let events = vec![
        Feedback::Good,
        Feedback::Bad,
        Feedback::Close,
        Feedback::Esc,
        Feedback::Focus,
        Feedback::Submit {
            value: "Too slow".into(),
        },
        Feedback::Submit {
            value: String::new(),
        },
    ];
    let explorer = PathExplorer::new(&workflow, events);
    let plans = explorer.simple_path_plans();

    for plan in &plans {
        println!("{}", plan.description());
        for path in plan.paths() {
            println!("  {}", path.description());
        }
    }

    let executor = PlanExecutor::new(&workflow, ExecutorConfig::new().with_max_concurrency(4));
    let report = executor.execute_all(&plans, &Widget::new).await;

    println!("\n{report}");
    println!("\n=== Example Complete ===");
}
