//! Page controllers: what is mounted under the overlay.

mod catalog;
mod search;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use cineview_api::tmdb::{ListParams, TmdbApi};

pub use catalog::{BANNER_ID, CatalogPage, CatalogRow, CatalogSource};
pub use search::{GridStatus, SEARCH_MOVIE_ID, SEARCH_SHOW_ID, SearchGrid, SearchPage};

use crate::carousel::{Carousel, CarouselConfig};
use crate::content::ContentItem;
use crate::fetch::FetchScope;
use crate::route::Route;

/// A mounted page.
#[derive(Debug)]
pub enum Page {
    /// Movies home or TV home.
    Catalog(CatalogPage),
    /// Search results.
    Search(SearchPage),
}

impl Page {
    /// Builds the page a route lives on, with every slot pending.
    #[must_use]
    pub fn for_route(route: &Route, config: CarouselConfig) -> Self {
        match route {
            Route::Home { .. } => Self::Catalog(CatalogPage::home(config)),
            Route::Tv { .. } => Self::Catalog(CatalogPage::tv(config)),
            Route::Search { keyword, .. } => Self::Search(SearchPage::new(keyword.clone())),
        }
    }

    /// Starts this page's fetches.
    pub fn spawn_fetches<A>(&self, api: &Arc<A>, params: &ListParams, scope: &mut FetchScope)
    where
        A: TmdbApi + Sync + 'static,
    {
        match self {
            Self::Catalog(page) => page.spawn_fetches(api, params, scope),
            Self::Search(page) => page.spawn_fetches(api, params, scope),
        }
    }

    /// Stores a row or grid result.
    pub fn apply_row(&mut self, row: usize, result: Result<Vec<ContentItem>>) {
        match self {
            Self::Catalog(page) => page.apply_row(row, result),
            Self::Search(page) => page.apply_row(row, result),
        }
    }

    /// Loaded carousels (none on the search page).
    pub fn carousels_mut(&mut self) -> impl Iterator<Item = &mut Carousel> {
        let catalog = match self {
            Self::Catalog(page) => Some(page),
            Self::Search(_) => None,
        };
        catalog.into_iter().flat_map(|page| page.carousels_mut())
    }

    /// Runs every carousel's timeout check.
    pub fn tick(&mut self, now: Instant) {
        for carousel in self.carousels_mut() {
            carousel.tick(now);
        }
    }
}
