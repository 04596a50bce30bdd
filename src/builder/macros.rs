//! Macros for ergonomic workflow construction.

/// Generate an event enum together with its `Event` implementation.
///
/// Each variant maps to the kind name used in transition declarations.
/// Variants may carry named payload fields.
///
/// # Example
///
/// ```
/// use pathwise::event_enum;
/// use pathwise::core::Event;
///
/// event_enum! {
///     pub enum FeedbackEvent {
///         ClickGood => "CLICK_GOOD",
///         ClickBad => "CLICK_BAD",
///         Submit { value: String } => "SUBMIT",
///         Close => "CLOSE",
///     }
/// }
///
/// assert_eq!(FeedbackEvent::ClickGood.name(), "CLICK_GOOD");
/// assert_eq!(FeedbackEvent::KINDS, &["CLICK_GOOD", "CLICK_BAD", "SUBMIT", "CLOSE"]);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $fty:ty),* $(,)? })? => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $({ $($field: $fty),* })?
            ),*
        }

        impl $crate::core::Event for $name {
            const KINDS: &'static [&'static str] = &[$($label),*];

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => $label),*
                }
            }
        }
    };
}
