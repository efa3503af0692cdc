//! Search page: one movie grid and one show grid for a keyword.

use std::sync::Arc;

use anyhow::{Context, Result};
use cineview_api::tmdb::{ListParams, SearchMovieParams, SearchTvParams, TmdbApi};

use crate::content::{ContentItem, from_page};
use crate::fetch::{FetchEvent, FetchScope};
use crate::loadable::Loadable;
use crate::selection::Selection;

/// Carousel id of the movie grid.
pub const SEARCH_MOVIE_ID: &str = "search-movie";
/// Carousel id of the show grid.
pub const SEARCH_SHOW_ID: &str = "search-show";

const MOVIE_ROW: usize = 0;
const SHOW_ROW: usize = 1;

/// What a grid should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridStatus<'a> {
    /// Request pending or failed.
    Searching,
    /// Request returned nothing.
    NoResults,
    /// Results in API order.
    Results(&'a [ContentItem]),
}

/// One result grid.
#[derive(Debug)]
pub struct SearchGrid {
    /// Carousel id recorded on selection.
    pub carousel_id: &'static str,
    /// Heading.
    pub title: &'static str,
    /// Results once loaded.
    pub results: Loadable<Vec<ContentItem>>,
}

impl SearchGrid {
    const fn new(carousel_id: &'static str, title: &'static str) -> Self {
        Self {
            carousel_id,
            title,
            results: Loadable::Pending,
        }
    }

    /// Display status.
    #[must_use]
    pub fn status(&self) -> GridStatus<'_> {
        match self.results.ready() {
            None => GridStatus::Searching,
            Some(items) if items.is_empty() => GridStatus::NoResults,
            Some(items) => GridStatus::Results(items),
        }
    }

    /// Selection for the result at `position`.
    #[must_use]
    pub fn select(&self, position: usize) -> Option<Selection> {
        let item = self.results.ready()?.get(position)?;
        Some(Selection::new(self.carousel_id, item.clone()))
    }
}

/// Search results for one keyword.
#[derive(Debug)]
pub struct SearchPage {
    keyword: String,
    grids: Vec<SearchGrid>,
}

impl SearchPage {
    /// Page for an already-normalized keyword.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            grids: vec![
                SearchGrid::new(SEARCH_MOVIE_ID, "Movies"),
                SearchGrid::new(SEARCH_SHOW_ID, "TV Shows"),
            ],
        }
    }

    /// The keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// `true` when there is nothing to search for yet.
    #[must_use]
    pub fn is_prompt(&self) -> bool {
        self.keyword.is_empty()
    }

    /// Movie grid then show grid.
    #[must_use]
    pub fn grids(&self) -> &[SearchGrid] {
        &self.grids
    }

    /// Starts the movie and show searches. Does nothing for an empty keyword.
    pub fn spawn_fetches<A>(&self, api: &Arc<A>, params: &ListParams, scope: &mut FetchScope)
    where
        A: TmdbApi + Sync + 'static,
    {
        if self.is_prompt() {
            return;
        }

        let mut movie_params =
            SearchMovieParams::new(self.keyword.clone()).language(params.language.clone());
        if let Some(region) = &params.region {
            movie_params = movie_params.region(region.clone());
        }
        let movie_api = Arc::clone(api);
        scope.spawn(async move {
            let result = movie_api
                .search_movie(&movie_params)
                .await
                .context("failed to search movies")
                .map(from_page);
            FetchEvent::Row {
                row: MOVIE_ROW,
                result,
            }
        });

        let show_params =
            SearchTvParams::new(self.keyword.clone()).language(params.language.clone());
        let show_api = Arc::clone(api);
        scope.spawn(async move {
            let result = show_api
                .search_tv(&show_params)
                .await
                .context("failed to search shows")
                .map(from_page);
            FetchEvent::Row {
                row: SHOW_ROW,
                result,
            }
        });
    }

    /// Stores a grid fetch result.
    pub fn apply_row(&mut self, row: usize, result: Result<Vec<ContentItem>>) {
        let Some(grid) = self.grids.get_mut(row) else {
            return;
        };
        if let Err(err) = &result {
            tracing::warn!(carousel_id = grid.carousel_id, "search failed: {err:#}");
        }
        grid.results = Loadable::from_result(result);
    }
}
