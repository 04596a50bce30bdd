//! Errors for malformed workflow definitions.

use crate::core::StateId;
use thiserror::Error;

/// A single problem found in a workflow definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Workflow has no states. Add at least one with .state(..)")]
    NoStates,

    #[error("Initial state not specified. Call .initial(key) before .build()")]
    MissingInitialState,

    #[error("Initial state '{0}' does not exist")]
    UnknownInitialState(String),

    #[error("Compound state '{state}' has children but no initial child")]
    MissingChildInitial { state: StateId },

    #[error("Compound state '{state}' declares unknown initial child '{initial}'")]
    UnknownChildInitial { state: StateId, initial: String },

    #[error("Duplicate state id '{0}'")]
    DuplicateState(StateId),

    #[error("State key '{0}' is empty or contains '.' or '#'")]
    InvalidKey(String),

    #[error("Transition on '{source_state}' for {event} targets unknown state '{target}'")]
    UnknownTarget {
        source_state: String,
        event: String,
        target: String,
    },

    #[error("Transition on '{source_state}' for {event} references unregistered guard '{guard}'")]
    UnknownGuard {
        source_state: String,
        event: String,
        guard: String,
    },

    #[error("Transition on '{source_state}' uses unknown event '{event}'")]
    UnknownEvent { source_state: String, event: String },

    #[error("Transition on '{source_state}' for {event} has no candidates")]
    EmptyTransition { source_state: String, event: String },

    #[error("Final state '{0}' declares outgoing transitions")]
    FinalStateHasTransitions(StateId),

    #[error("Final state '{0}' declares child states")]
    FinalStateHasChildren(StateId),

    #[error("Unknown state '{0}'")]
    UnknownState(StateId),
}

/// Every problem found while building a workflow.
///
/// Validation does not stop at the first problem; all of them are
/// collected so a definition can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid workflow '{id}': {}", summarize(.errors))]
pub struct InvalidWorkflow {
    pub id: String,
    pub errors: Vec<ModelError>,
}

impl InvalidWorkflow {
    pub fn contains(&self, error: &ModelError) -> bool {
        self.errors.contains(error)
    }
}

fn summarize(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
