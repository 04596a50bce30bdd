//! Paths through a workflow.
//!
//! A path is an immutable, ordered record of the events that lead from the
//! initial state to a destination, along with the transition each event
//! resolved through.

use crate::core::{Event, StateId, TransitionId};
use serde::{Deserialize, Serialize};

/// One event applied in one state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Step<E: Event> {
    /// Leaf the event was applied in
    pub source: StateId,
    /// The concrete event, including its payload case
    pub event: E,
    /// Candidate the event resolved through
    pub transition: TransitionId,
    /// Leaf reached after the event
    pub target: StateId,
}

/// Ordered sequence of steps from the initial state.
///
/// Recording returns a new path, leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use pathwise::core::{StateId, TransitionId};
/// use pathwise::explore::{Path, Step};
/// use pathwise::event_enum;
///
/// event_enum! {
///     enum Click {
///         Bad => "CLICK_BAD",
///     }
/// }
///
/// let path = Path::new(StateId::new("question"));
/// let next = path.record(Step {
///     source: StateId::new("question"),
///     event: Click::Bad,
///     transition: TransitionId {
///         source: Some(StateId::new("question")),
///         event: "CLICK_BAD".into(),
///         index: 0,
///         target: StateId::new("form"),
///     },
///     target: StateId::new("form"),
/// });
///
/// assert!(path.is_empty());
/// assert_eq!(next.destination(), &StateId::new("form"));
/// assert_eq!(next.description(), "via CLICK_BAD");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Path<E: Event> {
    start: StateId,
    steps: Vec<Step<E>>,
}

impl<E: Event> Path<E> {
    /// Empty path that stays in `start`.
    pub fn new(start: StateId) -> Self {
        Self {
            start,
            steps: Vec::new(),
        }
    }

    /// Record a step, returning a new path.
    pub fn record(&self, step: Step<E>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            start: self.start.clone(),
            steps,
        }
    }

    pub fn start(&self) -> &StateId {
        &self.start
    }

    pub fn steps(&self) -> &[Step<E>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Leaf the path ends in.
    pub fn destination(&self) -> &StateId {
        self.steps.last().map_or(&self.start, |step| &step.target)
    }

    /// States visited, in order: the start, then each step's target.
    pub fn states(&self) -> Vec<&StateId> {
        std::iter::once(&self.start)
            .chain(self.steps.iter().map(|step| &step.target))
            .collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.steps.iter().map(|step| &step.event)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionId> {
        self.steps.iter().map(|step| &step.transition)
    }

    /// Whether any state appears more than once.
    pub fn has_repeated_state(&self) -> bool {
        let states = self.states();
        let unique: std::collections::HashSet<_> = states.iter().collect();
        unique.len() != states.len()
    }

    /// Event labels joined in order, e.g. `via CLICK_BAD → SUBMIT {"value":""}`.
    pub fn description(&self) -> String {
        if self.steps.is_empty() {
            return "via initial state".to_string();
        }
        let labels: Vec<String> = self.events().map(Event::label).collect();
        format!("via {}", labels.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_enum;

    event_enum! {
        enum TestEvent {
            Bad => "CLICK_BAD",
            Submit { value: String } => "SUBMIT",
        }
    }

    fn step(from: &str, event: TestEvent, to: &str) -> Step<TestEvent> {
        Step {
            source: StateId::new(from),
            transition: TransitionId {
                source: Some(StateId::new(from)),
                event: event.name().to_string(),
                index: 0,
                target: StateId::new(to),
            },
            event,
            target: StateId::new(to),
        }
    }

    fn bad_then_submit(value: &str) -> Path<TestEvent> {
        Path::new(StateId::new("question"))
            .record(step("question", TestEvent::Bad, "form"))
            .record(step(
                "form",
                TestEvent::Submit {
                    value: value.to_string(),
                },
                "thanks",
            ))
    }

    #[test]
    fn new_path_is_empty() {
        let path: Path<TestEvent> = Path::new(StateId::new("question"));
        assert!(path.is_empty());
        assert_eq!(path.destination(), &StateId::new("question"));
        assert_eq!(path.states(), vec![&StateId::new("question")]);
        assert_eq!(path.description(), "via initial state");
    }

    #[test]
    fn record_is_immutable() {
        let path = Path::new(StateId::new("question"));
        let longer = path.record(step("question", TestEvent::Bad, "form"));

        assert_eq!(path.len(), 0);
        assert_eq!(longer.len(), 1);
    }

    #[test]
    fn states_follow_steps() {
        let path = bad_then_submit("something");
        let states: Vec<&str> = path.states().into_iter().map(StateId::as_str).collect();
        assert_eq!(states, vec!["question", "form", "thanks"]);
        assert!(!path.has_repeated_state());
    }

    #[test]
    fn description_joins_event_labels() {
        assert_eq!(
            bad_then_submit("").description(),
            r#"via CLICK_BAD → SUBMIT {"value":""}"#
        );
    }

    #[test]
    fn repeated_state_is_detected() {
        let path = Path::new(StateId::new("a"))
            .record(step("a", TestEvent::Bad, "b"))
            .record(step("b", TestEvent::Bad, "a"));
        assert!(path.has_repeated_state());
    }

    #[test]
    fn path_serializes_correctly() {
        let path = bad_then_submit("x");
        let json = serde_json::to_string(&path).unwrap();
        let back: Path<TestEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
