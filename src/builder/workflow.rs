//! Builder for constructing workflows.

use crate::builder::error::{InvalidWorkflow, ModelError};
use crate::builder::state::{push_candidates, StateBuilder};
use crate::core::{
    Candidate, Event, Guard, GuardRegistry, ResolvedCandidate, StateId, StateKind, StateNode,
    TransitionDef, TransitionId,
};
use crate::model::Workflow;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

type Check = Validation<(), NonEmptyVec<ModelError>>;

/// Builder for constructing workflows with a fluent API.
///
/// `build()` validates the whole definition and reports every problem it
/// finds, not just the first.
pub struct WorkflowBuilder<C, E> {
    id: String,
    initial: Option<String>,
    states: Vec<StateBuilder>,
    transitions: Vec<(String, Vec<Candidate>)>,
    guards: GuardRegistry<C, E>,
    context: C,
}

impl<C: Default, E: Event> WorkflowBuilder<C, E> {
    /// Create a builder whose extended state starts at `C::default()`.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_context(id, C::default())
    }
}

impl<C, E: Event> WorkflowBuilder<C, E> {
    /// Create a builder with an explicit extended state.
    pub fn with_context(id: impl Into<String>, context: C) -> Self {
        Self {
            id: id.into(),
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            guards: GuardRegistry::new(),
            context,
        }
    }

    /// Set the initial top-level state (required).
    pub fn initial(mut self, key: impl Into<String>) -> Self {
        self.initial = Some(key.into());
        self
    }

    /// Add a top-level state.
    pub fn state(mut self, state: StateBuilder) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple top-level states at once.
    pub fn states(mut self, states: Vec<StateBuilder>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a root-level transition, inherited by every non-final leaf.
    pub fn on(self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on_candidates(event, vec![Candidate::to(target)])
    }

    /// Add a root-level ordered candidate list.
    pub fn on_candidates(mut self, event: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        push_candidates(&mut self.transitions, event.into(), candidates);
        self
    }

    /// Register a named guard predicate.
    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        self.guards.register(name, Guard::new(predicate));
        self
    }

    /// Validate the definition and compile it into a [`Workflow`].
    pub fn build(self) -> Result<Workflow<C, E>, InvalidWorkflow> {
        let mut checks: Vec<Check> = Vec::new();

        if self.states.is_empty() {
            checks.push(Validation::fail(ModelError::NoStates));
        }

        let declared = flatten(&self.states);
        let ids = declared_ids(&declared, &mut checks);

        let initial = match &self.initial {
            None => {
                checks.push(Validation::fail(ModelError::MissingInitialState));
                None
            }
            Some(key) => {
                let id = StateId::new(key.as_str());
                if ids.contains(&id) {
                    Some(id)
                } else {
                    checks.push(Validation::fail(ModelError::UnknownInitialState(key.clone())));
                    None
                }
            }
        };

        let resolver = Resolver {
            ids: &ids,
            guards: &self.guards,
            known_events: E::KINDS,
        };

        let root_transitions = resolver.transitions(None, &self.transitions, &mut checks);

        let mut nodes = Vec::with_capacity(declared.len());
        for (id, parent, decl) in &declared {
            let kind = node_kind(id, decl, &mut checks);
            let transitions = resolver.transitions(Some(id), &decl.transitions, &mut checks);
            nodes.push(StateNode {
                id: id.clone(),
                parent: parent.clone(),
                kind,
                expectation: decl.expectation.clone(),
                transitions,
            });
        }

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Failure(errors) => Err(InvalidWorkflow {
                id: self.id,
                errors: errors.iter().cloned().collect(),
            }),
            Validation::Success(_) => match initial {
                Some(initial) => {
                    debug!(
                        workflow = %self.id,
                        states = nodes.len(),
                        transitions = root_transitions
                            .iter()
                            .chain(nodes.iter().flat_map(|node| node.transitions.iter()))
                            .map(|def| def.candidates.len())
                            .sum::<usize>(),
                        guards = self.guards.len(),
                        "workflow built"
                    );
                    Ok(Workflow::from_parts(
                        self.id,
                        initial,
                        root_transitions,
                        nodes,
                        self.guards,
                        self.context,
                    ))
                }
                None => Err(InvalidWorkflow {
                    id: self.id,
                    errors: vec![ModelError::MissingInitialState],
                }),
            },
        }
    }
}

/// Pre-order walk of the declaration tree: (id, parent, declaration).
fn flatten(states: &[StateBuilder]) -> Vec<(StateId, Option<StateId>, &StateBuilder)> {
    fn walk<'a>(
        states: &'a [StateBuilder],
        parent: Option<&StateId>,
        out: &mut Vec<(StateId, Option<StateId>, &'a StateBuilder)>,
    ) {
        for state in states {
            let id = StateId::child_of(parent, &state.key);
            out.push((id.clone(), parent.cloned(), state));
            walk(&state.children, Some(&id), out);
        }
    }

    let mut out = Vec::new();
    walk(states, None, &mut out);
    out
}

fn declared_ids(
    declared: &[(StateId, Option<StateId>, &StateBuilder)],
    checks: &mut Vec<Check>,
) -> HashSet<StateId> {
    let mut ids = HashSet::new();
    for (id, _, decl) in declared {
        if decl.key.is_empty() || decl.key.contains(['.', '#']) {
            checks.push(Validation::fail(ModelError::InvalidKey(decl.key.clone())));
        }
        if !ids.insert(id.clone()) {
            checks.push(Validation::fail(ModelError::DuplicateState(id.clone())));
        }
    }
    ids
}

fn node_kind(id: &StateId, decl: &StateBuilder, checks: &mut Vec<Check>) -> StateKind {
    if decl.is_final {
        if !decl.transitions.is_empty() {
            checks.push(Validation::fail(ModelError::FinalStateHasTransitions(id.clone())));
        }
        if !decl.children.is_empty() {
            checks.push(Validation::fail(ModelError::FinalStateHasChildren(id.clone())));
        }
        return StateKind::Final;
    }

    match (&decl.initial, decl.children.is_empty()) {
        (None, true) => StateKind::Atomic,
        (None, false) => {
            checks.push(Validation::fail(ModelError::MissingChildInitial { state: id.clone() }));
            StateKind::Atomic
        }
        (Some(initial), _) => {
            if decl.children.iter().any(|child| child.key == *initial) {
                StateKind::Compound {
                    initial: StateId::child_of(Some(id), initial),
                }
            } else {
                checks.push(Validation::fail(ModelError::UnknownChildInitial {
                    state: id.clone(),
                    initial: initial.clone(),
                }));
                StateKind::Atomic
            }
        }
    }
}

/// Resolves declared transitions against the set of known ids.
struct Resolver<'a, C, E> {
    ids: &'a HashSet<StateId>,
    guards: &'a GuardRegistry<C, E>,
    known_events: &'static [&'static str],
}

impl<C, E: Event> Resolver<'_, C, E> {
    fn transitions(
        &self,
        source: Option<&StateId>,
        declared: &[(String, Vec<Candidate>)],
        checks: &mut Vec<Check>,
    ) -> Vec<TransitionDef> {
        let source_name = source.map_or_else(|| "(root)".to_string(), ToString::to_string);

        declared
            .iter()
            .map(|(event, candidates)| {
                if !self.known_events.iter().any(|known| *known == event.as_str()) {
                    checks.push(Validation::fail(ModelError::UnknownEvent {
                        source_state: source_name.clone(),
                        event: event.clone(),
                    }));
                }
                if candidates.is_empty() {
                    checks.push(Validation::fail(ModelError::EmptyTransition {
                        source_state: source_name.clone(),
                        event: event.clone(),
                    }));
                }

                let resolved = candidates
                    .iter()
                    .enumerate()
                    .filter_map(|(index, candidate)| {
                        if let Some(guard) = candidate.guard() {
                            if !self.guards.contains(guard) {
                                checks.push(Validation::fail(ModelError::UnknownGuard {
                                    source_state: source_name.clone(),
                                    event: event.clone(),
                                    guard: guard.to_string(),
                                }));
                            }
                        }

                        match self.target(source, candidate.target()) {
                            Some(target) => Some(ResolvedCandidate {
                                guard: candidate.guard().map(str::to_string),
                                id: TransitionId {
                                    source: source.cloned(),
                                    event: event.clone(),
                                    index,
                                    target: target.clone(),
                                },
                                target,
                            }),
                            None => {
                                checks.push(Validation::fail(ModelError::UnknownTarget {
                                    source_state: source_name.clone(),
                                    event: event.clone(),
                                    target: candidate.target().to_string(),
                                }));
                                None
                            }
                        }
                    })
                    .collect();

                TransitionDef {
                    event: event.clone(),
                    candidates: resolved,
                }
            })
            .collect()
    }

    /// `#a.b` is absolute, `.child` is relative to the declaring node, and
    /// anything else names a sibling of the declaring node (a top-level
    /// state when declared on the root).
    fn target(&self, source: Option<&StateId>, target: &str) -> Option<StateId> {
        let id = if let Some(absolute) = target.strip_prefix('#') {
            StateId::new(absolute)
        } else if let Some(child) = target.strip_prefix(StateId::SEPARATOR) {
            StateId::child_of(source, child)
        } else {
            let base = source.and_then(StateId::parent);
            StateId::child_of(base.as_ref(), target)
        };
        self.ids.contains(&id).then_some(id)
    }
}

impl<C: Default, E: Event> Default for WorkflowBuilder<C, E> {
    fn default() -> Self {
        Self::new("workflow")
    }
}
