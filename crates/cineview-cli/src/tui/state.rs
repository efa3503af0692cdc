//! Browser TUI state: focus, search input, and carousel animation driving.

use std::time::{Duration, Instant};

use cineview_core::carousel::{Carousel, Direction, Phase};
use cineview_core::content::ContentItem;
use cineview_core::pages::{GridStatus, Page};
use cineview_core::route::{MIN_KEYWORD_CHARS, Route, is_valid_keyword};
use cineview_core::selection::Selection;

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search keyword input mode.
    Search,
}

/// Focused card.
///
/// On a catalog page row 0 is the banner and rows `1..` are the carousels.
/// On the search page row 0 is the movie grid and row 1 the show grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus {
    /// Focused row.
    pub row: usize,
    /// Card within the row's visible window.
    pub column: usize,
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserViewState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search box contents.
    pub search_input: String,
    /// Focused card.
    pub focus: Focus,
    /// One-line message shown in the footer.
    pub status: Option<String>,
    /// Carousel slide duration.
    pub animation: Duration,
}

impl BrowserViewState {
    /// Creates a new state with focus on the first row.
    #[must_use]
    pub const fn new(animation: Duration) -> Self {
        Self {
            input_mode: InputMode::Normal,
            search_input: String::new(),
            focus: Focus { row: 0, column: 0 },
            status: None,
            animation,
        }
    }

    /// Moves focus back to the first card of the first row.
    pub const fn reset_focus(&mut self) {
        self.focus = Focus { row: 0, column: 0 };
    }

    /// Keeps the focus inside the page after rows load or shrink.
    pub fn clamp_focus(&mut self, page: &Page) {
        let rows = row_count(page);
        self.focus.row = self.focus.row.min(rows.saturating_sub(1));
        let width = row_width(page, self.focus.row);
        self.focus.column = self.focus.column.min(width.saturating_sub(1));
    }

    /// Moves focus up one row.
    pub fn move_up(&mut self, page: &Page) {
        self.focus.row = self.focus.row.saturating_sub(1);
        self.clamp_focus(page);
    }

    /// Moves focus down one row.
    pub fn move_down(&mut self, page: &Page) {
        self.focus.row = self.focus.row.saturating_add(1);
        self.clamp_focus(page);
    }

    /// Cycles focus to the next row, wrapping to the first.
    pub fn next_row(&mut self, page: &Page) {
        let rows = row_count(page);
        let next = self.focus.row.saturating_add(1);
        self.focus.row = if next >= rows { 0 } else { next };
        self.clamp_focus(page);
    }

    /// Moves focus right. At the end of a carousel window, pages forward.
    pub fn move_right(&mut self, page: &mut Page, now: Instant) {
        let width = row_width(page, self.focus.row);
        let next = self.focus.column.saturating_add(1);
        if next < width {
            self.focus.column = next;
            return;
        }
        if let Some(carousel) = focused_carousel(page, self.focus.row)
            && carousel.advance(now).is_some()
        {
            self.focus.column = 0;
        }
    }

    /// Moves focus left. At the start of a carousel window, pages backward.
    pub fn move_left(&mut self, page: &mut Page, now: Instant) {
        if self.focus.column > 0 {
            self.focus.column = self.focus.column.saturating_sub(1);
            return;
        }
        if let Some(carousel) = focused_carousel(page, self.focus.row)
            && carousel.retreat(now).is_some()
        {
            self.focus.column = carousel.page_size().saturating_sub(1);
        }
    }

    /// Selection for the focused card, if it is loaded.
    ///
    /// A carousel leaving its page has nothing selectable until the exit
    /// animation settles.
    #[must_use]
    pub fn focused_selection(&self, page: &Page) -> Option<Selection> {
        match page {
            Page::Catalog(catalog) => match self.focus.row.checked_sub(1) {
                None => catalog.banner_selection(),
                Some(row) => catalog
                    .rows()
                    .get(row)?
                    .carousel
                    .ready()
                    .filter(|carousel| !carousel.is_transitioning())?
                    .select(self.focus.column),
            },
            Page::Search(search) => search.grids().get(self.focus.row)?.select(self.focus.column),
        }
    }

    /// Starts keyword entry.
    pub fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input.clear();
        self.status = None;
    }

    /// Leaves keyword entry without searching.
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_input.clear();
    }

    /// Appends a character to the search box.
    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
    }

    /// Removes the last character from the search box.
    pub fn search_pop(&mut self) {
        self.search_input.pop();
    }

    /// Route for the typed keyword.
    ///
    /// Returns `None` and keeps the input open when the keyword is too short.
    pub fn submit_search(&mut self) -> Option<Route> {
        if !is_valid_keyword(&self.search_input) {
            self.status = Some(format!(
                "Enter at least {MIN_KEYWORD_CHARS} characters to search"
            ));
            return None;
        }
        let route = Route::search(&self.search_input);
        self.cancel_search();
        self.status = None;
        Some(route)
    }
}

/// Number of focusable rows.
#[must_use]
pub fn row_count(page: &Page) -> usize {
    match page {
        Page::Catalog(catalog) => catalog.rows().len().saturating_add(1),
        Page::Search(search) => search.grids().len(),
    }
}

/// Number of focusable cards in `row`.
#[must_use]
pub fn row_width(page: &Page, row: usize) -> usize {
    match page {
        Page::Catalog(catalog) => match row.checked_sub(1) {
            None => usize::from(catalog.banner_selection().is_some()),
            Some(index) => catalog
                .rows()
                .get(index)
                .and_then(|r| r.carousel.ready())
                .map_or(0, |c| c.current_window().len()),
        },
        Page::Search(search) => match search.grids().get(row).map(|g| g.status()) {
            Some(GridStatus::Results(items)) => items.len(),
            _ => 0,
        },
    }
}

fn focused_carousel(page: &mut Page, row: usize) -> Option<&mut Carousel> {
    let Page::Catalog(catalog) = page else {
        return None;
    };
    let index = row.checked_sub(1)?;
    catalog.rows_mut().get_mut(index)?.carousel.ready_mut()
}

/// Reports finished slide animations to their carousels.
///
/// Returns `true` if any carousel changed phase.
pub fn settle_animations(page: &mut Page, now: Instant, animation: Duration) -> bool {
    let mut changed = false;
    for carousel in page.carousels_mut() {
        if carousel.progress(now, animation) < 1.0 {
            continue;
        }
        changed |= match carousel.phase() {
            Phase::Idle => false,
            Phase::TransitioningOut { .. } => carousel.on_transition_settled(now),
            Phase::TransitioningIn { .. } => carousel.on_enter_settled(),
        };
    }
    changed
}

/// Cards to draw for a carousel at `now`.
///
/// While the outgoing window animates, the strip of outgoing and incoming
/// cards slides by whole cards in the paging direction.
#[must_use]
pub fn visible_cards(carousel: &Carousel, now: Instant, animation: Duration) -> Vec<&ContentItem> {
    let current = carousel.current_window();
    let (Phase::TransitioningOut { started, .. }, Some(incoming)) =
        (carousel.phase(), carousel.incoming_window())
    else {
        return current.iter().collect();
    };

    let page_size = carousel.page_size();
    let elapsed = now.saturating_duration_since(started).as_millis();
    let total = animation.as_millis().max(1);
    let scaled = elapsed
        .saturating_mul(u128::try_from(page_size).unwrap_or(u128::MAX))
        .checked_div(total)
        .unwrap_or(0);
    let shifted = usize::try_from(scaled).unwrap_or(page_size).min(page_size);

    match carousel.direction() {
        Direction::Forward => current
            .iter()
            .chain(incoming)
            .skip(shifted)
            .take(page_size)
            .collect(),
        Direction::Backward => incoming
            .iter()
            .chain(current)
            .skip(page_size.saturating_sub(shifted))
            .take(page_size)
            .collect(),
    }
}
