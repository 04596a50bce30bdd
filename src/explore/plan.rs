//! Test plans: a destination state with every path that reaches it.

use crate::core::{Event, StateId, StateNode};
use crate::explore::path::Path;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Plan<E: Event> {
    state: StateId,
    expectation: Option<String>,
    paths: Vec<Path<E>>,
}

impl<E: Event> Plan<E> {
    pub fn new(destination: &StateNode, paths: Vec<Path<E>>) -> Self {
        Self {
            state: destination.id().clone(),
            expectation: destination.expectation().map(str::to_string),
            paths,
        }
    }

    /// Destination leaf.
    pub fn state(&self) -> &StateId {
        &self.state
    }

    /// What the destination's assertion checks, if it has one.
    pub fn expectation(&self) -> Option<&str> {
        self.expectation.as_deref()
    }

    pub fn paths(&self) -> &[Path<E>] {
        &self.paths
    }

    pub fn description(&self) -> String {
        describe_destination(&self.state)
    }
}

/// Plan description for a destination.
pub(crate) fn describe_destination(state: &StateId) -> String {
    format!("reaches state: {state}")
}
