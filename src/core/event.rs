//! Event trait for the inputs that drive a workflow.
//!
//! Events are an enumerated tagged union: one variant per event kind, with
//! the payload carried in the variant. Drivers dispatch on them with an
//! exhaustive `match`, so adding a kind is a compile error until every
//! driver handles it.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Trait for workflow events.
///
/// # Example
///
/// ```rust
/// use pathwise::core::Event;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum FeedbackEvent {
///     Close,
///     Submit { value: String },
/// }
///
/// impl Event for FeedbackEvent {
///     const KINDS: &'static [&'static str] = &["CLOSE", "SUBMIT"];
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Close => "CLOSE",
///             Self::Submit { .. } => "SUBMIT",
///         }
///     }
/// }
///
/// let submit = FeedbackEvent::Submit { value: String::new() };
/// assert_eq!(submit.name(), "SUBMIT");
/// assert_eq!(submit.label(), r#"SUBMIT {"value":""}"#);
/// assert_eq!(FeedbackEvent::Close.label(), "CLOSE");
/// ```
pub trait Event: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Every event kind name this type can produce.
    ///
    /// Used at build time to reject transitions keyed on unknown events.
    const KINDS: &'static [&'static str];

    /// Name of the event kind, as used in transition declarations.
    fn name(&self) -> &str;

    /// Human-readable label: the kind name, followed by the payload when
    /// the variant carries one.
    fn label(&self) -> String {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => match map.into_iter().next() {
                Some((_, payload)) => format!("{} {}", self.name(), payload),
                None => self.name().to_string(),
            },
            _ => self.name().to_string(),
        }
    }
}
