//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions of the workflow's extended state and
//! the event being resolved. They are registered once under a name and
//! referenced by that name from any number of transition candidates.

use super::event::Event;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a transition candidate applies.
///
/// # Example
///
/// ```rust
/// use pathwise::core::{Event, Guard};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum FormEvent {
///     Submit(String),
/// }
///
/// impl Event for FormEvent {
///     const KINDS: &'static [&'static str] = &["SUBMIT"];
///     fn name(&self) -> &str {
///         "SUBMIT"
///     }
/// }
///
/// let has_text = Guard::new(|_: &(), e: &FormEvent| match e {
///     FormEvent::Submit(text) => !text.is_empty(),
/// });
///
/// assert!(has_text.check(&(), &FormEvent::Submit("great".into())));
/// assert!(!has_text.check(&(), &FormEvent::Submit(String::new())));
/// ```
pub struct Guard<C, E> {
    predicate: Arc<dyn Fn(&C, &E) -> bool + Send + Sync>,
}

impl<C, E: Event> Guard<C, E> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard against the extended state and event.
    pub fn check(&self, context: &C, event: &E) -> bool {
        (self.predicate)(context, event)
    }
}

impl<C, E> Clone for Guard<C, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C, E> fmt::Debug for Guard<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Named guards shared by every transition of a workflow.
pub struct GuardRegistry<C, E> {
    guards: HashMap<String, Guard<C, E>>,
}

impl<C, E: Event> GuardRegistry<C, E> {
    pub fn new() -> Self {
        Self {
            guards: HashMap::new(),
        }
    }

    /// Register a guard, replacing any guard already under `name`.
    pub fn register(&mut self, name: impl Into<String>, guard: Guard<C, E>) {
        self.guards.insert(name.into(), guard);
    }

    pub fn get(&self, name: &str) -> Option<&Guard<C, E>> {
        self.guards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    /// Evaluate the named guard. An unregistered name never passes.
    pub fn check(&self, name: &str, context: &C, event: &E) -> bool {
        self.guards
            .get(name)
            .is_some_and(|guard| guard.check(context, event))
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl<C, E: Event> Default for GuardRegistry<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> Clone for GuardRegistry<C, E> {
    fn clone(&self) -> Self {
        Self {
            guards: self.guards.clone(),
        }
    }
}
