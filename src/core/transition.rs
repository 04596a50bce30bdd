//! Guarded transitions between state nodes.

use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One declared target of a transition, optionally gated by a named guard.
///
/// Candidates are declared in priority order; the first whose guard passes
/// (or that has no guard) is taken.
///
/// # Example
///
/// ```rust
/// use pathwise::core::Candidate;
///
/// let candidates = vec![
///     Candidate::when("formValid", "submitted"),
///     Candidate::to("invalid"),
/// ];
/// assert_eq!(candidates[0].guard(), Some("formValid"));
/// assert!(candidates[1].guard().is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Candidate {
    guard: Option<String>,
    target: String,
}

impl Candidate {
    /// Unconditional candidate.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            guard: None,
            target: target.into(),
        }
    }

    /// Candidate taken only when the named guard passes.
    pub fn when(guard: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            guard: Some(guard.into()),
            target: target.into(),
        }
    }

    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    /// Target as declared, before resolution against the tree.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Identity of one declared transition candidate.
///
/// This is the unit of transition coverage: a candidate counts as covered
/// once a step resolved through it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct TransitionId {
    /// Node declaring the transition; `None` for the workflow root.
    pub source: Option<StateId>,
    pub event: String,
    /// Position among the candidates declared for `event` on `source`.
    pub index: usize,
    /// Resolved target node.
    pub target: StateId,
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}")?,
            None => f.write_str("(root)")?,
        }
        write!(f, " --{}[{}]--> {}", self.event, self.index, self.target)
    }
}

/// A candidate after target resolution.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedCandidate {
    pub guard: Option<String>,
    pub target: StateId,
    pub id: TransitionId,
}

/// All candidates declared on one node for one event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransitionDef {
    pub event: String,
    pub candidates: Vec<ResolvedCandidate>,
}

impl TransitionDef {
    pub fn ids(&self) -> impl Iterator<Item = &TransitionId> {
        self.candidates.iter().map(|c| &c.id)
    }
}

/// Outcome of resolving an event against the current state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Resolution {
    /// Leaf state after the event.
    pub target: StateId,
    /// Candidate taken; `None` when the event was a no-op.
    pub transition: Option<TransitionId>,
}

impl Resolution {
    pub fn noop(current: StateId) -> Self {
        Self {
            target: current,
            transition: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.transition.is_none()
    }
}
