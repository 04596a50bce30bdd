//! The compiled workflow graph.
//!
//! A [`Workflow`] is the validated, flattened form of a declaration tree:
//! state nodes with explicit parent links, resolved transition targets and
//! the guard registry. Resolving an event is a pure function of the
//! workflow, the current leaf and the event.

mod workflow;

pub use workflow::Workflow;
