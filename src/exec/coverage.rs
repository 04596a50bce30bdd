//! Coverage accounting.
//!
//! A `CoverageRecord` is a plain value: each path execution receives one
//! and hands back the updated record, and the caller merges them. Merging
//! is a set union, so the result does not depend on the order in which
//! concurrent executions finish.
//!
//! Completeness is judged on states. Simple paths never re-enter a state,
//! so back-edges of a cyclic workflow cannot be replayed; transition
//! coverage is reported alongside as `transitions_complete`.

use crate::core::{Event, StateId, TransitionId};
use crate::explore::Path;
use crate::model::Workflow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// States and transitions exercised during a test run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    states: BTreeSet<StateId>,
    transitions: BTreeSet<TransitionId>,
}

impl CoverageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited state; its ancestors count as visited too.
    pub fn with_state(mut self, state: &StateId) -> Self {
        self.mark_state(state);
        self
    }

    pub fn with_transition(mut self, transition: &TransitionId) -> Self {
        self.mark_transition(transition);
        self
    }

    /// Record every state and transition along `path`.
    pub fn with_path<E: Event>(mut self, path: &Path<E>) -> Self {
        for state in path.states() {
            self.mark_state(state);
        }
        for transition in path.transitions() {
            self.mark_transition(transition);
        }
        self
    }

    /// Union of both records.
    pub fn merge(mut self, other: CoverageRecord) -> Self {
        self.states.extend(other.states);
        self.transitions.extend(other.transitions);
        self
    }

    pub(crate) fn mark_state(&mut self, state: &StateId) {
        let mut cursor = Some(state.clone());
        while let Some(id) = cursor {
            cursor = id.parent();
            self.states.insert(id);
        }
    }

    pub(crate) fn mark_transition(&mut self, transition: &TransitionId) {
        self.transitions.insert(transition.clone());
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn transitions(&self) -> &BTreeSet<TransitionId> {
        &self.transitions
    }

    pub fn covers_state(&self, state: &StateId) -> bool {
        self.states.contains(state)
    }

    pub fn covers_transition(&self, transition: &TransitionId) -> bool {
        self.transitions.contains(transition)
    }

    /// Compare against every state and transition of `workflow`.
    ///
    /// `complete` holds once every state is covered. Missing transitions
    /// are listed either way.
    pub fn report<C, E: Event>(&self, workflow: &Workflow<C, E>) -> CoverageReport {
        let all_states: Vec<&StateId> = workflow.state_ids().collect();
        let all_transitions: Vec<&TransitionId> = workflow.transition_ids().collect();

        let missing_states: Vec<StateId> = all_states
            .iter()
            .filter(|id| !self.states.contains(**id))
            .map(|id| (*id).clone())
            .collect();
        let missing_transitions: Vec<TransitionId> = all_transitions
            .iter()
            .filter(|id| !self.transitions.contains(**id))
            .map(|id| (*id).clone())
            .collect();

        CoverageReport {
            complete: missing_states.is_empty(),
            transitions_complete: missing_transitions.is_empty(),
            states_total: all_states.len(),
            states_covered: all_states.len() - missing_states.len(),
            transitions_total: all_transitions.len(),
            transitions_covered: all_transitions.len() - missing_transitions.len(),
            missing_states,
            missing_transitions,
        }
    }
}

impl FromIterator<CoverageRecord> for CoverageRecord {
    fn from_iter<I: IntoIterator<Item = CoverageRecord>>(iter: I) -> Self {
        iter.into_iter().fold(CoverageRecord::new(), CoverageRecord::merge)
    }
}

/// Verdict of a coverage comparison.
///
/// A shortfall is data for the caller to act on, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Every state was reached
    pub complete: bool,
    /// Every declared transition was taken
    pub transitions_complete: bool,
    pub states_covered: usize,
    pub states_total: usize,
    pub transitions_covered: usize,
    pub transitions_total: usize,
    pub missing_states: Vec<StateId>,
    pub missing_transitions: Vec<TransitionId>,
}

impl CoverageReport {
    /// Fraction of states and transitions covered, 1.0 for an empty model.
    pub fn ratio(&self) -> f64 {
        let total = self.states_total + self.transitions_total;
        if total == 0 {
            return 1.0;
        }
        (self.states_covered + self.transitions_covered) as f64 / total as f64
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "states {}/{}, transitions {}/{}",
            self.states_covered, self.states_total, self.transitions_covered, self.transitions_total
        )?;
        for state in &self.missing_states {
            write!(f, "\n  missing state: {state}")?;
        }
        for transition in &self.missing_transitions {
            write!(f, "\n  missing transition: {transition}")?;
        }
        Ok(())
    }
}
