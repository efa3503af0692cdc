//! Per-widget fetch slot.

use anyhow::Result;

/// State of one independently fetched piece of data.
///
/// `Failed` is kept distinct for logging, but renderers present it exactly
/// like `Pending`: a widget whose fetch failed keeps its loading indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    /// Request in flight.
    #[default]
    Pending,
    /// Data arrived.
    Ready(T),
    /// Request failed with the given message.
    Failed(String),
}

impl<T> Loadable<T> {
    /// Converts a fetch result, flattening the error chain into the message.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(format!("{err:#}")),
        }
    }

    /// Loaded value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Mutable access to the loaded value.
    pub const fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Returns `true` while the widget should show its loading indicator.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        !matches!(self, Self::Ready(_))
    }

    /// Maps the loaded value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Pending => Loadable::Pending,
            Self::Ready(value) => Loadable::Ready(f(value)),
            Self::Failed(message) => Loadable::Failed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, anyhow};

    use super::*;

    #[test]
    fn test_failed_is_presented_as_loading() {
        // Arrange
        let failed: Loadable<u32> = Loadable::from_result(Err(anyhow!("boom")));

        // Act & Assert
        assert!(failed.is_loading());
        assert!(Loadable::<u32>::Pending.is_loading());
        assert!(!Loadable::Ready(1).is_loading());
    }

    #[test]
    fn test_failure_message_keeps_context_chain() {
        // Arrange
        let result: Result<u32> = Err(anyhow!("connection reset")).context("failed to fetch list");

        // Act
        let loadable = Loadable::from_result(result);

        // Assert
        assert_eq!(
            loadable,
            Loadable::Failed(String::from("failed to fetch list: connection reset"))
        );
    }
}
