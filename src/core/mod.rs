//! Core workflow types.
//!
//! This module contains the pure vocabulary of a workflow:
//! - Events via the `Event` trait
//! - Named guard predicates over extended state and event
//! - State ids and nodes with explicit parent links
//! - Guarded transition candidates and their identities
//!
//! Nothing here performs I/O; drivers and execution live in `exec`.

mod event;
mod guard;
mod state;
mod transition;

pub use event::Event;
pub use guard::{Guard, GuardRegistry};
pub use state::{StateId, StateKind, StateNode};
pub use transition::{Candidate, Resolution, ResolvedCandidate, TransitionDef, TransitionId};
