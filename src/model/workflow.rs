//! Compiled workflow graph and event resolution.

use crate::builder::ModelError;
use crate::core::{
    Event, GuardRegistry, Resolution, StateId, StateKind, StateNode, TransitionDef, TransitionId,
};
use std::collections::HashMap;
use std::fmt;

/// Immutable, validated workflow.
///
/// Built once through [`WorkflowBuilder`](crate::builder::WorkflowBuilder)
/// and never mutated afterwards. All queries are pure.
pub struct Workflow<C, E> {
    id: String,
    initial: StateId,
    root_transitions: Vec<TransitionDef>,
    nodes: Vec<StateNode>,
    index: HashMap<StateId, usize>,
    guards: GuardRegistry<C, E>,
    context: C,
}

impl<C, E: Event> Workflow<C, E> {
    /// Assemble a workflow from already-validated parts.
    pub(crate) fn from_parts(
        id: String,
        initial: StateId,
        root_transitions: Vec<TransitionDef>,
        nodes: Vec<StateNode>,
        guards: GuardRegistry<C, E>,
        context: C,
    ) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        let mut workflow = Self {
            id,
            initial,
            root_transitions,
            nodes,
            index,
            guards,
            context,
        };
        workflow.initial = workflow.entry_leaf(&workflow.initial);
        workflow
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Leaf the workflow starts in (compound initials already entered).
    pub fn initial(&self) -> &StateId {
        &self.initial
    }

    /// Extended state the guards are evaluated against.
    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn guards(&self) -> &GuardRegistry<C, E> {
        &self.guards
    }

    pub fn state(&self, id: &StateId) -> Option<&StateNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Every node in declaration order (parents before children).
    pub fn states(&self) -> &[StateNode] {
        &self.nodes
    }

    /// Nodes that can be the current state.
    pub fn leaves(&self) -> impl Iterator<Item = &StateNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn state_ids(&self) -> impl Iterator<Item = &StateId> {
        self.nodes.iter().map(|node| &node.id)
    }

    pub fn root_transitions(&self) -> &[TransitionDef] {
        &self.root_transitions
    }

    /// Every declared transition candidate, root first.
    pub fn transition_ids(&self) -> impl Iterator<Item = &TransitionId> {
        self.root_transitions
            .iter()
            .chain(self.nodes.iter().flat_map(|node| node.transitions.iter()))
            .flat_map(TransitionDef::ids)
    }

    pub fn is_final(&self, id: &StateId) -> bool {
        self.state(id).is_some_and(StateNode::is_final)
    }

    /// The node itself followed by its ancestors, innermost first.
    /// The root is not a node and is not included.
    pub fn ancestors(&self, id: &StateId) -> Vec<&StateNode> {
        let mut lineage = Vec::new();
        let mut cursor = self.state(id);
        while let Some(node) = cursor {
            lineage.push(node);
            cursor = node.parent.as_ref().and_then(|parent| self.state(parent));
        }
        lineage
    }

    /// Leaf reached by entering `id`: compound nodes descend through their
    /// initial child until a leaf is found.
    pub fn entry_leaf(&self, id: &StateId) -> StateId {
        let mut current = id.clone();
        while let Some(StateKind::Compound { initial }) = self.state(&current).map(StateNode::kind) {
            current = initial.clone();
        }
        current
    }

    /// Resolve `event` in state `current`.
    ///
    /// The innermost declaring node wins: candidates on the current leaf
    /// are tried first, then each ancestor, then the root. Within a node,
    /// candidates are tried in declaration order and the first passing
    /// guard wins. When nothing matches the event is a no-op and the
    /// current state is returned unchanged. Final states ignore all events,
    /// including transitions declared on their ancestors.
    ///
    /// A compound `current` is treated as its entry leaf.
    pub fn transition(&self, current: &StateId, event: &E) -> Result<Resolution, ModelError> {
        if self.state(current).is_none() {
            return Err(ModelError::UnknownState(current.clone()));
        }
        let leaf = self.entry_leaf(current);

        if self.is_final(&leaf) {
            return Ok(Resolution::noop(leaf));
        }

        let name = event.name();
        let declared = self
            .ancestors(&leaf)
            .into_iter()
            .flat_map(|node| node.transitions.iter())
            .chain(self.root_transitions.iter())
            .filter(|def| def.event == name);

        for def in declared {
            for candidate in &def.candidates {
                let passes = candidate
                    .guard
                    .as_deref()
                    .map_or(true, |guard| self.guards.check(guard, &self.context, event));
                if passes {
                    return Ok(Resolution {
                        target: self.entry_leaf(&candidate.target),
                        transition: Some(candidate.id.clone()),
                    });
                }
            }
        }

        Ok(Resolution::noop(leaf))
    }

    /// Resolve `event` in state `current`, returning only the next state.
    pub fn resolve(&self, current: &StateId, event: &E) -> Result<StateId, ModelError> {
        self.transition(current, event).map(|resolution| resolution.target)
    }
}

impl<C, E> fmt::Debug for Workflow<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field("states", &self.nodes.len())
            .field("root_transitions", &self.root_transitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{StateBuilder, WorkflowBuilder};
    use crate::core::{Candidate, Event, StateId};
    use crate::event_enum;

    event_enum! {
        enum FormEvent {
            Submit { value: String } => "SUBMIT",
            Focus => "FOCUS",
            Close => "CLOSE",
            Esc => "ESC",
        }
    }

    fn submit(value: &str) -> FormEvent {
        FormEvent::Submit {
            value: value.to_string(),
        }
    }

    fn form_workflow() -> crate::model::Workflow<(), FormEvent> {
        WorkflowBuilder::new("feedback")
            .initial("form")
            .on("ESC", "closed")
            .guard("formValid", |_: &(), e: &FormEvent| {
                matches!(e, FormEvent::Submit { value } if !value.is_empty())
            })
            .state(
                StateBuilder::new("form")
                    .initial("pending")
                    .child(StateBuilder::new("pending").on_candidates(
                        "SUBMIT",
                        vec![Candidate::when("formValid", "submitted"), Candidate::to("invalid")],
                    ))
                    .child(StateBuilder::new("invalid").on("FOCUS", "pending"))
                    .child(StateBuilder::new("submitted").final_state())
                    .on("CLOSE", "closed"),
            )
            .state(StateBuilder::new("closed").final_state())
            .build()
            .unwrap()
    }

    #[test]
    fn initial_enters_compound_child() {
        let workflow = form_workflow();
        assert_eq!(workflow.initial(), &StateId::new("form.pending"));
    }

    #[test]
    fn first_passing_guard_wins() {
        let workflow = form_workflow();
        let next = workflow.resolve(workflow.initial(), &submit("hi")).unwrap();
        assert_eq!(next, "form.submitted");
    }

    #[test]
    fn fallback_candidate_taken_when_guard_fails() {
        let workflow = form_workflow();
        let next = workflow.resolve(workflow.initial(), &submit("")).unwrap();
        assert_eq!(next, "form.invalid");
    }

    #[test]
    fn sibling_target_resolves_within_parent() {
        let workflow = form_workflow();
        let next = workflow
            .resolve(&StateId::new("form.invalid"), &FormEvent::Focus)
            .unwrap();
        assert_eq!(next, "form.pending");
    }

    #[test]
    fn ancestor_transition_applies_to_descendants() {
        let workflow = form_workflow();
        for leaf in ["form.pending", "form.invalid"] {
            let resolution = workflow
                .transition(&StateId::new(leaf), &FormEvent::Close)
                .unwrap();
            assert_eq!(resolution.target, "closed");
            let taken = resolution.transition.unwrap();
            assert_eq!(taken.source, Some(StateId::new("form")));
        }
    }

    #[test]
    fn root_transition_applies_to_every_non_final_leaf() {
        let workflow = form_workflow();
        let resolution = workflow
            .transition(&StateId::new("form.invalid"), &FormEvent::Esc)
            .unwrap();
        assert_eq!(resolution.target, "closed");
        assert_eq!(resolution.transition.unwrap().source, None);
    }

    #[test]
    fn final_state_ignores_inherited_transitions() {
        let workflow = form_workflow();
        let resolution = workflow
            .transition(&StateId::new("closed"), &FormEvent::Esc)
            .unwrap();
        assert!(resolution.is_noop());
        assert_eq!(resolution.target, "closed");
    }

    #[test]
    fn nested_final_state_ignores_ancestor_transitions() {
        let workflow = form_workflow();
        let submitted = StateId::new("form.submitted");
        assert!(workflow.is_final(&submitted));

        for event in [FormEvent::Close, FormEvent::Esc] {
            let resolution = workflow.transition(&submitted, &event).unwrap();
            assert!(resolution.is_noop());
            assert_eq!(resolution.target, "form.submitted");
        }
    }

    #[test]
    fn guarded_only_event_without_passing_guard_is_noop() {
        let workflow: crate::model::Workflow<(), FormEvent> = WorkflowBuilder::new("strict")
            .initial("form")
            .guard("hasText", |_: &(), e: &FormEvent| {
                matches!(e, FormEvent::Submit { value } if !value.is_empty())
            })
            .state(StateBuilder::new("form").on_when("SUBMIT", "hasText", "thanks"))
            .state(StateBuilder::new("thanks"))
            .build()
            .unwrap();
        let form = StateId::new("form");

        let empty = workflow.transition(&form, &submit("")).unwrap();
        assert!(empty.is_noop());
        assert_eq!(empty.target, "form");

        let filled = workflow.transition(&form, &submit("great")).unwrap();
        assert_eq!(filled.target, "thanks");
    }

    #[test]
    fn failing_inner_guard_falls_through_to_ancestor() {
        let workflow: crate::model::Workflow<(), FormEvent> = WorkflowBuilder::new("layered")
            .initial("form")
            .guard("formValid", |_: &(), e: &FormEvent| {
                matches!(e, FormEvent::Submit { value } if !value.is_empty())
            })
            .state(
                StateBuilder::new("form")
                    .initial("pending")
                    .child(StateBuilder::new("pending").on_when("SUBMIT", "formValid", "sent"))
                    .child(StateBuilder::new("sent"))
                    .on("SUBMIT", "rejected"),
            )
            .state(StateBuilder::new("rejected"))
            .build()
            .unwrap();
        let pending = StateId::new("form.pending");

        let valid = workflow.transition(&pending, &submit("ok")).unwrap();
        assert_eq!(valid.target, "form.sent");
        assert_eq!(valid.transition.unwrap().source, Some(pending.clone()));

        let invalid = workflow.transition(&pending, &submit("")).unwrap();
        assert_eq!(invalid.target, "rejected");
        assert_eq!(invalid.transition.unwrap().source, Some(StateId::new("form")));
    }

    #[test]
    fn unmatched_event_is_noop() {
        let workflow = form_workflow();
        let resolution = workflow
            .transition(&StateId::new("form.pending"), &FormEvent::Focus)
            .unwrap();
        assert!(resolution.is_noop());
        assert_eq!(resolution.target, "form.pending");
    }

    #[test]
    fn unknown_state_is_an_error() {
        let workflow = form_workflow();
        let result = workflow.resolve(&StateId::new("nowhere"), &FormEvent::Close);
        assert!(result.is_err());
    }

    #[test]
    fn ancestors_are_innermost_first() {
        let workflow = form_workflow();
        let lineage: Vec<_> = workflow
            .ancestors(&StateId::new("form.invalid"))
            .into_iter()
            .map(|node| node.id().clone())
            .collect();
        assert_eq!(lineage, vec![StateId::new("form.invalid"), StateId::new("form")]);
    }

    #[test]
    fn ids_enumerate_every_state_and_candidate() {
        let workflow = form_workflow();
        let states: Vec<_> = workflow.state_ids().map(StateId::as_str).collect();
        assert_eq!(
            states,
            vec!["form", "form.pending", "form.invalid", "form.submitted", "closed"]
        );
        // ESC (root), SUBMIT x2, FOCUS, CLOSE
        assert_eq!(workflow.transition_ids().count(), 5);
        assert_eq!(workflow.leaves().count(), 4);
        assert_eq!(FormEvent::KINDS.len(), 4);
    }
}
