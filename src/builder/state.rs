//! Builder for declaring state nodes.

use crate::core::Candidate;

/// Declaration of one state node and, for compound states, its children.
///
/// # Example
///
/// ```rust
/// use pathwise::builder::StateBuilder;
/// use pathwise::core::Candidate;
///
/// let form = StateBuilder::new("form")
///     .initial("pending")
///     .child(StateBuilder::new("pending").on_candidates(
///         "SUBMIT",
///         vec![Candidate::when("formValid", "submitted"), Candidate::to("invalid")],
///     ))
///     .child(StateBuilder::new("invalid").on("FOCUS", "pending"))
///     .child(StateBuilder::new("submitted"))
///     .on("CLOSE", "closed")
///     .expectation("form screen visible");
///
/// assert_eq!(form.key(), "form");
/// assert_eq!(form.children().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct StateBuilder {
    pub(crate) key: String,
    pub(crate) is_final: bool,
    pub(crate) initial: Option<String>,
    pub(crate) children: Vec<StateBuilder>,
    pub(crate) transitions: Vec<(String, Vec<Candidate>)>,
    pub(crate) expectation: Option<String>,
}

impl StateBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_final: false,
            initial: None,
            children: Vec::new(),
            transitions: Vec::new(),
            expectation: None,
        }
    }

    /// Add an unconditional transition.
    pub fn on(self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on_candidates(event, vec![Candidate::to(target)])
    }

    /// Add a transition guarded by a named guard.
    pub fn on_when(
        self,
        event: impl Into<String>,
        guard: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.on_candidates(event, vec![Candidate::when(guard, target)])
    }

    /// Add an ordered candidate list for an event.
    ///
    /// Declaring the same event again appends to its candidate list.
    pub fn on_candidates(mut self, event: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        push_candidates(&mut self.transitions, event.into(), candidates);
        self
    }

    /// Set the initial child (required once children are added).
    pub fn initial(mut self, key: impl Into<String>) -> Self {
        self.initial = Some(key.into());
        self
    }

    /// Add a nested child state, making this a compound state.
    pub fn child(mut self, child: StateBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Mark this state as final.
    pub fn final_state(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Attach an assertion: describes what the driver must observe here.
    pub fn expectation(mut self, expectation: impl Into<String>) -> Self {
        self.expectation = Some(expectation.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn children(&self) -> &[StateBuilder] {
        &self.children
    }
}

pub(crate) fn push_candidates(
    transitions: &mut Vec<(String, Vec<Candidate>)>,
    event: String,
    candidates: Vec<Candidate>,
) {
    match transitions.iter_mut().find(|(name, _)| *name == event) {
        Some((_, existing)) => existing.extend(candidates),
        None => transitions.push((event, candidates)),
    }
}
