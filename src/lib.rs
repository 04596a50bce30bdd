//! Pathwise: model-based UI test generation
//!
//! Pathwise turns a hierarchical state machine describing a user-facing
//! workflow into executable tests. The model is pure data: states, guarded
//! transitions and named guard predicates, validated in one pass when the
//! workflow is built. Exploration enumerates the event sequences that reach
//! every state, and the executor replays them against a `Driver` while
//! keeping track of which states and transitions were exercised.
//!
//! # Core Concepts
//!
//! - **Workflow**: Validated, immutable state tree built with `WorkflowBuilder`
//! - **Events**: A closed enum implementing `Event`, usually via `event_enum!`
//! - **Guards**: Pure predicates over extended state and event, registered by name
//! - **Plans**: Every path reaching one destination state
//! - **Coverage**: States and transitions exercised, merged across paths
//!
//! # Example
//!
//! ```rust
//! use pathwise::builder::{final_state, leaf, StateBuilder, WorkflowBuilder};
//! use pathwise::explore::PathExplorer;
//! use pathwise::event_enum;
//!
//! event_enum! {
//!     enum Feedback {
//!         Good => "CLICK_GOOD",
//!         Bad => "CLICK_BAD",
//!         Close => "CLOSE",
//!     }
//! }
//!
//! let workflow = WorkflowBuilder::<(), Feedback>::new("feedback")
//!     .initial("question")
//!     .state(leaf("question", &[("CLICK_GOOD", "thanks"), ("CLICK_BAD", "form")]))
//!     .state(leaf("form", &[("CLOSE", "closed")]))
//!     .state(leaf("thanks", &[("CLOSE", "closed")]))
//!     .state(final_state("closed"))
//!     .build()
//!     .unwrap();
//!
//! let explorer = PathExplorer::new(&workflow, [Feedback::Good, Feedback::Bad, Feedback::Close]);
//! let plans = explorer.simple_path_plans();
//!
//! assert_eq!(plans.len(), 4);
//! assert_eq!(plans[3].description(), "reaches state: closed");
//! assert_eq!(plans[3].paths().len(), 2);
//! assert!(explorer.unreachable_states().is_empty());
//! ```

pub mod builder;
pub mod core;
pub mod exec;
pub mod explore;
pub mod model;

// Re-export commonly used types
pub use builder::{InvalidWorkflow, ModelError, StateBuilder, WorkflowBuilder};
pub use crate::core::{Event, Guard, GuardRegistry, StateId, StateNode, TransitionId};
pub use exec::{
    CoverageRecord, CoverageReport, Driver, DriverError, DriverFactory, ExecutorConfig,
    PlanExecutor, SessionReport,
};
pub use explore::{Path, PathExplorer, Plan};
pub use model::Workflow;
