//! State identifiers and nodes of the workflow graph.
//!
//! A workflow is a tree of state nodes. Every node is addressed by the
//! dotted path of keys from the root (`form.pending`), and points to its
//! parent explicitly. Only leaves (atomic and final nodes) are ever the
//! current state; compound nodes are entered through their initial child.

use super::transition::TransitionDef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full dotted path identifying a state node.
///
/// # Example
///
/// ```rust
/// use pathwise::core::StateId;
///
/// let id = StateId::new("form.pending");
/// assert_eq!(id.key(), "pending");
/// assert_eq!(id.parent(), Some(StateId::new("form")));
/// assert!(StateId::new("form").parent().is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub const SEPARATOR: char = '.';

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of a child `key` under `parent`, or a top-level id when there is
    /// no parent.
    pub fn child_of(parent: Option<&StateId>, key: &str) -> Self {
        match parent {
            Some(parent) => Self(format!("{}{}{}", parent.0, Self::SEPARATOR, key)),
            None => Self(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path.
    pub fn key(&self) -> &str {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map_or(self.0.as_str(), |(_, key)| key)
    }

    /// Id of the enclosing node, `None` for top-level states.
    pub fn parent(&self) -> Option<StateId> {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    pub fn depth(&self) -> usize {
        self.0.matches(Self::SEPARATOR).count()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for StateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Structural kind of a state node.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum StateKind {
    /// Leaf with outgoing transitions (possibly none).
    Atomic,
    /// Node owning a nested sub-graph, entered through `initial`.
    Compound { initial: StateId },
    /// Terminal leaf: no outgoing transitions, none inherited.
    Final,
}

/// A node of the compiled workflow tree.
#[derive(Clone, Debug)]
pub struct StateNode {
    pub(crate) id: StateId,
    pub(crate) parent: Option<StateId>,
    pub(crate) kind: StateKind,
    pub(crate) expectation: Option<String>,
    pub(crate) transitions: Vec<TransitionDef>,
}

impl StateNode {
    pub fn id(&self) -> &StateId {
        &self.id
    }

    pub fn key(&self) -> &str {
        self.id.key()
    }

    /// Enclosing node; `None` means the workflow root.
    pub fn parent(&self) -> Option<&StateId> {
        self.parent.as_ref()
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// What the driver is expected to observe in this state, if the state
    /// carries an assertion.
    pub fn expectation(&self) -> Option<&str> {
        self.expectation.as_deref()
    }

    pub fn has_assertion(&self) -> bool {
        self.expectation.is_some()
    }

    pub fn is_final(&self) -> bool {
        matches!(self.kind, StateKind::Final)
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, StateKind::Compound { .. })
    }

    pub fn transitions(&self) -> &[TransitionDef] {
        &self.transitions
    }

    /// Transitions declared on this node for `event`.
    pub fn transitions_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a TransitionDef> {
        self.transitions.iter().filter(move |t| t.event == event)
    }
}
