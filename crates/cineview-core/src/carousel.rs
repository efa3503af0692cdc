//! Paginated carousel over a rating-sorted content list.
//!
//! A carousel shows one fixed-size window at a time. Paging is a
//! two-step transition: the outgoing window animates away
//! (`TransitioningOut`), the page index is committed once that animation
//! settles, and the incoming window animates in (`TransitioningIn`).
//! Paging requests are ignored while the outgoing animation runs.

use std::time::{Duration, Instant};

use crate::content::ContentItem;
use crate::selection::Selection;

/// Default number of cards per window.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Default time after which an unsettled animation is settled by `tick`.
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_secs(2);

/// Carousel tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CarouselConfig {
    /// Cards per window (at least 1).
    pub page_size: usize,
    /// Fallback for a lost animation-settled signal.
    pub transition_timeout: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            transition_timeout: DEFAULT_TRANSITION_TIMEOUT,
        }
    }
}

/// Slide direction of the last paging request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Outgoing window leaves to the left, incoming enters from the right.
    Forward,
    /// Mirror of `Forward`.
    Backward,
}

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No animation running.
    Idle,
    /// The current window is animating out toward `target`.
    TransitioningOut {
        /// Page that becomes current when the exit settles.
        target: usize,
        /// When the exit began.
        started: Instant,
    },
    /// The new window is animating in.
    TransitioningIn {
        /// When the entry began.
        started: Instant,
    },
}

/// A paging request that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Page being left.
    pub from: usize,
    /// Page being entered.
    pub to: usize,
    /// Slide direction.
    pub direction: Direction,
}

/// One category row.
#[derive(Debug, Clone)]
pub struct Carousel {
    id: String,
    contents: Vec<ContentItem>,
    page_size: usize,
    transition_timeout: Duration,
    page_index: usize,
    direction: Direction,
    phase: Phase,
}

impl Carousel {
    /// Creates a carousel over `contents`, sorted by descending rating.
    pub fn new(id: impl Into<String>, contents: Vec<ContentItem>, config: CarouselConfig) -> Self {
        let mut carousel = Self {
            id: id.into(),
            contents: Vec::new(),
            page_size: config.page_size.max(1),
            transition_timeout: config.transition_timeout,
            page_index: 0,
            direction: Direction::Forward,
            phase: Phase::Idle,
        };
        carousel.initialize(contents);
        carousel
    }

    /// Replaces the contents and resets paging.
    ///
    /// Sorting is stable: equal ratings keep their input order.
    pub fn initialize(&mut self, mut contents: Vec<ContentItem>) {
        contents.sort_by(|a, b| b.vote_average().total_cmp(&a.vote_average()));
        self.contents = contents;
        self.page_index = 0;
        self.direction = Direction::Forward;
        self.phase = Phase::Idle;
    }

    /// Carousel id, e.g. `popular`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All items in display order.
    #[must_use]
    pub fn contents(&self) -> &[ContentItem] {
        &self.contents
    }

    /// Cards per window.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Direction of the last accepted paging request.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current animation phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` only while the outgoing window is animating.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::TransitioningOut { .. })
    }

    /// Last full page, or `None` when the list is shorter than one page.
    ///
    /// Items past the last full page are never shown.
    #[must_use]
    pub const fn max_page_index(&self) -> Option<usize> {
        (self.contents.len() / self.page_size).checked_sub(1)
    }

    /// Last page if paging is possible at all.
    const fn pageable_max(&self) -> Option<usize> {
        match self.max_page_index() {
            Some(max) if max > 0 => Some(max),
            _ => None,
        }
    }

    /// Starts paging forward, wrapping from the last page to the first.
    pub fn advance(&mut self, now: Instant) -> Option<Transition> {
        if self.is_transitioning() {
            return None;
        }
        let max = self.pageable_max()?;
        let to = if self.page_index >= max {
            0
        } else {
            self.page_index.saturating_add(1)
        };
        Some(self.start(to, Direction::Forward, now))
    }

    /// Starts paging backward, wrapping from the first page to the last.
    pub fn retreat(&mut self, now: Instant) -> Option<Transition> {
        if self.is_transitioning() {
            return None;
        }
        let max = self.pageable_max()?;
        let to = if self.page_index == 0 {
            max
        } else {
            self.page_index.saturating_sub(1)
        };
        Some(self.start(to, Direction::Backward, now))
    }

    fn start(&mut self, to: usize, direction: Direction, now: Instant) -> Transition {
        self.direction = direction;
        self.phase = Phase::TransitioningOut {
            target: to,
            started: now,
        };
        Transition {
            from: self.page_index,
            to,
            direction,
        }
    }

    /// Commits the pending page once the outgoing animation has finished.
    ///
    /// Returns `false` (and does nothing) outside `TransitioningOut`.
    pub fn on_transition_settled(&mut self, now: Instant) -> bool {
        let Phase::TransitioningOut { target, .. } = self.phase else {
            return false;
        };
        self.page_index = target;
        self.phase = Phase::TransitioningIn { started: now };
        true
    }

    /// Returns to `Idle` once the incoming animation has finished.
    pub fn on_enter_settled(&mut self) -> bool {
        if matches!(self.phase, Phase::TransitioningIn { .. }) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// Settles an animation nobody reported within the transition timeout.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::TransitioningOut { target, started } => {
                if now.saturating_duration_since(started) < self.transition_timeout {
                    return false;
                }
                tracing::warn!(
                    carousel_id = %self.id,
                    target,
                    "carousel exit animation did not settle in time, committing page"
                );
                self.on_transition_settled(now)
            }
            Phase::TransitioningIn { started } => {
                if now.saturating_duration_since(started) < self.transition_timeout {
                    return false;
                }
                tracing::warn!(
                    carousel_id = %self.id,
                    "carousel entry animation did not settle in time"
                );
                self.on_enter_settled()
            }
        }
    }

    /// Fraction (0.0 to 1.0) of the running animation that has elapsed.
    ///
    /// `Idle` reports 1.0.
    #[must_use]
    pub fn progress(&self, now: Instant, animation: Duration) -> f64 {
        let started = match self.phase {
            Phase::Idle => return 1.0,
            Phase::TransitioningOut { started, .. } | Phase::TransitioningIn { started } => started,
        };
        if animation.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        (elapsed / animation.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Items of page `page`, clamped to the list length.
    #[must_use]
    pub fn window_at(&self, page: usize) -> &[ContentItem] {
        let start = page.saturating_mul(self.page_size).min(self.contents.len());
        let end = start.saturating_add(self.page_size).min(self.contents.len());
        self.contents.get(start..end).unwrap_or_default()
    }

    /// Items currently on screen.
    #[must_use]
    pub fn current_window(&self) -> &[ContentItem] {
        self.window_at(self.page_index)
    }

    /// Items of the page being animated toward, if an exit is running.
    #[must_use]
    pub fn incoming_window(&self) -> Option<&[ContentItem]> {
        match self.phase {
            Phase::TransitioningOut { target, .. } => Some(self.window_at(target)),
            Phase::Idle | Phase::TransitioningIn { .. } => None,
        }
    }

    /// Selection for the card at `position` in the current window.
    #[must_use]
    pub fn select(&self, position: usize) -> Option<Selection> {
        self.current_window()
            .get(position)
            .map(|item| Selection::new(self.id.clone(), item.clone()))
    }
}
