//! Path exploration over a built workflow.
//!
//! The explorer enumerates every loop-free event sequence from the initial
//! state (or the shortest one per state) and groups them into plans, one per
//! reachable leaf. Exploration is pure: it only asks the model where an
//! event leads.

mod explorer;
mod path;
pub(crate) mod plan;

pub use explorer::PathExplorer;
pub use path::{Path, Step};
pub use plan::Plan;
