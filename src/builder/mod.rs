//! Builder API for declaring workflows.
//!
//! This module provides fluent builders and macros for declaring
//! hierarchical workflows with minimal boilerplate. Building validates the
//! whole definition at once; a malformed workflow never reaches the
//! explorer.

pub mod error;
pub mod macros;
pub mod state;
pub mod workflow;

pub use error::{InvalidWorkflow, ModelError};
pub use state::StateBuilder;
pub use workflow::WorkflowBuilder;

/// Shorthand for a leaf state with unconditional transitions.
///
/// # Example
///
/// ```
/// use pathwise::builder::leaf;
///
/// let thanks = leaf("thanks", &[("CLOSE", "closed")]);
/// assert_eq!(thanks.key(), "thanks");
/// ```
pub fn leaf(key: &str, transitions: &[(&str, &str)]) -> StateBuilder {
    transitions
        .iter()
        .fold(StateBuilder::new(key), |state, (event, target)| {
            state.on(*event, *target)
        })
}

/// Shorthand for a final state.
pub fn final_state(key: &str) -> StateBuilder {
    StateBuilder::new(key).final_state()
}
