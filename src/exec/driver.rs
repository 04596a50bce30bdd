//! The driver seam between plans and a live interface.
//!
//! A driver realizes events against whatever renders the workflow (a
//! browser page, a terminal, an in-memory component) and checks that the
//! observable surface matches a state. Implementations dispatch on the
//! event enum with an exhaustive `match`.

use crate::core::{Event, StateNode};
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Driver session unavailable: {0}")]
    Unavailable(String),
}

/// Executes events and state assertions against a live interface.
///
/// Each call is awaited before the next is issued; a driver never sees
/// two calls at once.
#[async_trait]
pub trait Driver<E: Event>: Send {
    /// Perform the UI action(s) realizing `event`, payload included.
    async fn dispatch(&mut self, event: &E) -> Result<(), DriverError>;

    /// Check that the interface currently shows `state`.
    ///
    /// Only called for states that carry an expectation.
    async fn verify(&mut self, state: &StateNode) -> Result<(), DriverError>;
}

/// Produces a fresh, independent driver session per path execution.
#[async_trait]
pub trait DriverFactory<E: Event>: Send + Sync {
    type Driver: Driver<E>;

    async fn launch(&self) -> Result<Self::Driver, DriverError>;
}

#[async_trait]
impl<E, D, F> DriverFactory<E> for F
where
    E: Event + 'static,
    D: Driver<E> + 'static,
    F: Fn() -> D + Send + Sync,
{
    type Driver = D;

    async fn launch(&self) -> Result<D, DriverError> {
        Ok(self())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StateId, StateKind};
    use crate::event_enum;

    event_enum! {
        enum Click {
            Good => "CLICK_GOOD",
            Close => "CLOSE",
        }
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    #[async_trait]
    impl Driver<Click> for Recorder {
        async fn dispatch(&mut self, event: &Click) -> Result<(), DriverError> {
            match event {
                Click::Good => self.log.push("click good-button".into()),
                Click::Close => self.log.push("click close-button".into()),
            }
            Ok(())
        }

        async fn verify(&mut self, state: &StateNode) -> Result<(), DriverError> {
            self.log.push(format!("verify {}", state.id()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn closure_factory_launches_fresh_drivers() {
        let factory = Recorder::default;

        let mut first = DriverFactory::<Click>::launch(&factory).await.unwrap();
        first.dispatch(&Click::Good).await.unwrap();
        let second = DriverFactory::<Click>::launch(&factory).await.unwrap();

        assert_eq!(first.log, vec!["click good-button"]);
        assert!(second.log.is_empty());
    }

    #[tokio::test]
    async fn driver_dispatches_on_event_kind() {
        let mut driver = Recorder::default();
        let node = StateNode {
            id: StateId::new("closed"),
            parent: None,
            kind: StateKind::Final,
            expectation: Some("widget gone".into()),
            transitions: Vec::new(),
        };

        driver.dispatch(&Click::Close).await.unwrap();
        driver.verify(&node).await.unwrap();

        assert_eq!(driver.log, vec!["click close-button", "verify closed"]);
    }

    #[test]
    fn driver_error_messages() {
        let err = DriverError::ElementNotFound("[data-testid=good-button]".into());
        assert_eq!(err.to_string(), "Element not found: [data-testid=good-button]");
    }
}
