//! Graph traversal producing paths and plans.

use crate::core::{Event, StateId};
use crate::explore::path::{Path, Step};
use crate::explore::plan::Plan;
use crate::model::Workflow;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Walks a workflow's graph from its initial state.
///
/// An edge is one concrete event instance applied in one leaf. The event
/// list decides both which events are tried and in what order; an event
/// kind tested with several payloads appears once per payload case, so
/// every case becomes its own branch.
pub struct PathExplorer<'w, C, E> {
    workflow: &'w Workflow<C, E>,
    events: Vec<E>,
}

impl<'w, C, E: Event> PathExplorer<'w, C, E> {
    pub fn new(workflow: &'w Workflow<C, E>, events: impl IntoIterator<Item = E>) -> Self {
        Self {
            workflow,
            events: events.into_iter().collect(),
        }
    }

    pub fn workflow(&self) -> &'w Workflow<C, E> {
        self.workflow
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Outgoing edges of `state`, in event order. No-ops are not edges.
    fn edges(&self, state: &StateId) -> Vec<Step<E>> {
        self.events
            .iter()
            .filter_map(|event| {
                let resolution = self.workflow.transition(state, event).ok()?;
                let transition = resolution.transition?;
                Some(Step {
                    source: state.clone(),
                    event: event.clone(),
                    transition,
                    target: resolution.target,
                })
            })
            .collect()
    }

    /// Every simple path from the initial state, keyed by destination.
    ///
    /// The initial state is reached by the empty path. A state never
    /// appears twice on one path, so cycles are cut and the walk is
    /// bounded by the number of states. Unreachable states are absent.
    pub fn simple_paths(&self) -> HashMap<StateId, Vec<Path<E>>> {
        let initial = self.workflow.initial().clone();
        let mut paths = HashMap::new();
        let mut on_path = HashSet::from([initial.clone()]);

        self.visit(Path::new(initial), &mut on_path, &mut paths);

        debug!(
            workflow = %self.workflow.id(),
            destinations = paths.len(),
            paths = paths.values().map(Vec::len).sum::<usize>(),
            "explored simple paths"
        );
        paths
    }

    fn visit(
        &self,
        path: Path<E>,
        on_path: &mut HashSet<StateId>,
        paths: &mut HashMap<StateId, Vec<Path<E>>>,
    ) {
        let here = path.destination().clone();
        paths
            .entry(here.clone())
            .or_default()
            .push(path.clone());

        for step in self.edges(&here) {
            let target = step.target.clone();
            if on_path.contains(&target) {
                continue;
            }
            on_path.insert(target.clone());
            self.visit(path.record(step), on_path, paths);
            on_path.remove(&target);
        }
    }

    /// Simple paths grouped into one plan per reachable leaf, in leaf
    /// declaration order.
    pub fn simple_path_plans(&self) -> Vec<Plan<E>> {
        let mut paths = self.simple_paths();
        self.plans(|id| paths.remove(id))
    }

    /// One shortest path per reachable leaf (breadth-first, ties broken by
    /// event order).
    pub fn shortest_paths(&self) -> HashMap<StateId, Path<E>> {
        let initial = self.workflow.initial().clone();
        let mut paths = HashMap::from([(initial.clone(), Path::new(initial.clone()))]);
        let mut queue = VecDeque::from([initial]);

        while let Some(state) = queue.pop_front() {
            let Some(path) = paths.get(&state).cloned() else {
                continue;
            };
            for step in self.edges(&state) {
                if paths.contains_key(&step.target) {
                    continue;
                }
                let target = step.target.clone();
                paths.insert(target.clone(), path.record(step));
                queue.push_back(target);
            }
        }

        debug!(
            workflow = %self.workflow.id(),
            destinations = paths.len(),
            "explored shortest paths"
        );
        paths
    }

    pub fn shortest_path_plans(&self) -> Vec<Plan<E>> {
        let mut paths = self.shortest_paths();
        self.plans(|id| paths.remove(id).map(|path| vec![path]))
    }

    /// Leaves that no event sequence reaches.
    pub fn unreachable_states(&self) -> Vec<StateId> {
        let reached = self.shortest_paths();
        self.workflow
            .leaves()
            .map(|node| node.id())
            .filter(|id| !reached.contains_key(*id))
            .cloned()
            .collect()
    }

    fn plans<F>(&self, mut take: F) -> Vec<Plan<E>>
    where
        F: FnMut(&StateId) -> Option<Vec<Path<E>>>,
    {
        self.workflow
            .leaves()
            .filter_map(|node| take(node.id()).map(|paths| Plan::new(node, paths)))
            .collect()
    }
}
