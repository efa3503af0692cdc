//! Last-clicked content, handed from a carousel to the overlay it opens.

use crate::content::{ContentItem, ContentRef};

/// Builds the shared visual transition id linking a carousel card to its overlay.
#[must_use]
pub fn transition_id(carousel_id: &str, content_id: u64) -> String {
    format!("slider_{carousel_id}_backdrop_{content_id}")
}

/// A clicked card and the carousel (or banner, or search grid) it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Carousel id of the origin, e.g. `now-playing` or `banner`.
    pub carousel_id: String,
    /// The clicked record, used as the overlay's summary.
    pub item: ContentItem,
}

impl Selection {
    /// Creates a selection.
    pub fn new(carousel_id: impl Into<String>, item: ContentItem) -> Self {
        Self {
            carousel_id: carousel_id.into(),
            item,
        }
    }

    /// The content the selection points at.
    #[must_use]
    pub const fn target(&self) -> ContentRef {
        self.item.content_ref()
    }

    /// Shared visual transition id for this card.
    #[must_use]
    pub fn transition_id(&self) -> String {
        transition_id(&self.carousel_id, self.item.id())
    }
}

/// Holds at most one selection between a click and the overlay it opens.
///
/// Owned by the browser. Cleared whenever the overlay closes, so a later
/// deep link never inherits a stale summary.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SelectionStore {
    current: Option<Selection>,
}

impl SelectionStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Records a click, replacing any earlier one.
    pub fn record(&mut self, selection: Selection) {
        tracing::debug!(
            carousel_id = %selection.carousel_id,
            content_id = selection.item.id(),
            "selection recorded"
        );
        self.current = Some(selection);
    }

    /// Current selection without consuming it.
    #[must_use]
    pub const fn peek(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Takes the selection if it was recorded for `target`.
    ///
    /// A selection for any other content is discarded.
    pub fn take_for(&mut self, target: ContentRef) -> Option<Selection> {
        self.current.take().filter(|s| s.target() == target)
    }

    /// Forgets the current selection.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
