//! Movies home and TV home: a banner plus four category carousels.

use std::sync::Arc;

use anyhow::{Context, Result};
use cineview_api::tmdb::{ListParams, MovieList, TmdbApi, TvList};

use crate::carousel::{Carousel, CarouselConfig};
use crate::content::{ContentItem, ContentKind, from_page};
use crate::fetch::{FetchEvent, FetchScope};
use crate::loadable::Loadable;
use crate::selection::Selection;

/// Carousel id recorded for banner clicks.
pub const BANNER_ID: &str = "banner";

/// Which list a row is fed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// A movie list.
    Movies(MovieList),
    /// A TV list.
    Shows(TvList),
}

/// One category row.
#[derive(Debug)]
pub struct CatalogRow {
    /// Carousel id, e.g. `now-playing`.
    pub carousel_id: &'static str,
    /// Heading.
    pub title: &'static str,
    /// Backing list.
    pub source: CatalogSource,
    /// Carousel once loaded.
    pub carousel: Loadable<Carousel>,
}

impl CatalogRow {
    const fn new(carousel_id: &'static str, title: &'static str, source: CatalogSource) -> Self {
        Self {
            carousel_id,
            title,
            source,
            carousel: Loadable::Pending,
        }
    }
}

/// A catalog home page.
///
/// The first row doubles as the banner source: its first result becomes
/// the banner and the carousel shows the rest.
#[derive(Debug)]
pub struct CatalogPage {
    kind: ContentKind,
    config: CarouselConfig,
    banner: Loadable<Option<ContentItem>>,
    rows: Vec<CatalogRow>,
}

impl CatalogPage {
    /// Movies home.
    #[must_use]
    pub fn home(config: CarouselConfig) -> Self {
        Self {
            kind: ContentKind::Movie,
            config,
            banner: Loadable::Pending,
            rows: vec![
                CatalogRow::new(
                    "now-playing",
                    "Now Playing",
                    CatalogSource::Movies(MovieList::NowPlaying),
                ),
                CatalogRow::new(
                    "popular",
                    "Popular",
                    CatalogSource::Movies(MovieList::Popular),
                ),
                CatalogRow::new(
                    "top-rated",
                    "Top Rated",
                    CatalogSource::Movies(MovieList::TopRated),
                ),
                CatalogRow::new(
                    "upcoming",
                    "Upcoming",
                    CatalogSource::Movies(MovieList::Upcoming),
                ),
            ],
        }
    }

    /// TV home.
    #[must_use]
    pub fn tv(config: CarouselConfig) -> Self {
        Self {
            kind: ContentKind::Show,
            config,
            banner: Loadable::Pending,
            rows: vec![
                CatalogRow::new(
                    "on-the-air",
                    "On The Air",
                    CatalogSource::Shows(TvList::OnTheAir),
                ),
                CatalogRow::new(
                    "airing-today",
                    "Airing Today",
                    CatalogSource::Shows(TvList::AiringToday),
                ),
                CatalogRow::new(
                    "popular",
                    "Popular",
                    CatalogSource::Shows(TvList::Popular),
                ),
                CatalogRow::new(
                    "top-rated",
                    "Top Rated",
                    CatalogSource::Shows(TvList::TopRated),
                ),
            ],
        }
    }

    /// Catalog this page shows.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Banner slot; `Ready(None)` when the first list came back empty.
    #[must_use]
    pub const fn banner(&self) -> &Loadable<Option<ContentItem>> {
        &self.banner
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    /// Mutable rows, for paging.
    pub fn rows_mut(&mut self) -> &mut [CatalogRow] {
        &mut self.rows
    }

    /// Loaded carousels.
    pub fn carousels_mut(&mut self) -> impl Iterator<Item = &mut Carousel> {
        self.rows.iter_mut().filter_map(|row| row.carousel.ready_mut())
    }

    /// Selection for a banner click.
    #[must_use]
    pub fn banner_selection(&self) -> Option<Selection> {
        let item = self.banner.ready()?.as_ref()?;
        Some(Selection::new(BANNER_ID, item.clone()))
    }

    /// Starts one independent fetch per row.
    pub fn spawn_fetches<A>(&self, api: &Arc<A>, params: &ListParams, scope: &mut FetchScope)
    where
        A: TmdbApi + Sync + 'static,
    {
        for (row, entry) in self.rows.iter().enumerate() {
            let api = Arc::clone(api);
            let params = params.clone();
            let source = entry.source;
            scope.spawn(async move {
                let result = fetch_row(api.as_ref(), source, &params).await;
                FetchEvent::Row { row, result }
            });
        }
    }

    /// Stores a row fetch result. Out-of-range rows are ignored.
    pub fn apply_row(&mut self, row: usize, result: Result<Vec<ContentItem>>) {
        let config = self.config;
        let feeds_banner = row == 0;
        let Some(entry) = self.rows.get_mut(row) else {
            return;
        };
        match result {
            Ok(mut items) => {
                if feeds_banner {
                    let banner = (!items.is_empty()).then(|| items.remove(0));
                    self.banner = Loadable::Ready(banner);
                }
                tracing::debug!(
                    carousel_id = entry.carousel_id,
                    items = items.len(),
                    "row loaded"
                );
                entry.carousel = Loadable::Ready(Carousel::new(entry.carousel_id, items, config));
            }
            Err(err) => {
                tracing::warn!(carousel_id = entry.carousel_id, "failed to load row: {err:#}");
                if feeds_banner {
                    self.banner = Loadable::Failed(format!("{err:#}"));
                }
                entry.carousel = Loadable::Failed(format!("{err:#}"));
            }
        }
    }
}

async fn fetch_row<A>(
    api: &A,
    source: CatalogSource,
    params: &ListParams,
) -> Result<Vec<ContentItem>>
where
    A: TmdbApi + Sync,
{
    match source {
        CatalogSource::Movies(list) => {
            let page = api
                .movie_list(list, params)
                .await
                .with_context(|| format!("failed to fetch {}", list.path()))?;
            Ok(from_page(page))
        }
        CatalogSource::Shows(list) => {
            let page = api
                .tv_list(list, params)
                .await
                .with_context(|| format!("failed to fetch {}", list.path()))?;
            Ok(from_page(page))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use anyhow::anyhow;

    use super::*;
    use crate::testing::movie;

    #[test]
    fn test_home_rows() {
        // Arrange & Act
        let page = CatalogPage::home(CarouselConfig::default());

        // Assert
        let ids: Vec<&str> = page.rows().iter().map(|r| r.carousel_id).collect();
        assert_eq!(ids, vec!["now-playing", "popular", "top-rated", "upcoming"]);
        assert_eq!(page.kind(), ContentKind::Movie);
        assert!(page.banner().is_loading());
    }

    #[test]
    fn test_tv_rows_include_airing_today() {
        // Arrange & Act
        let page = CatalogPage::tv(CarouselConfig::default());

        // Assert
        let ids: Vec<&str> = page.rows().iter().map(|r| r.carousel_id).collect();
        assert_eq!(ids, vec!["on-the-air", "airing-today", "popular", "top-rated"]);
        assert_eq!(
            page.rows()[1].source,
            CatalogSource::Shows(TvList::AiringToday)
        );
    }

    #[test]
    fn test_first_row_feeds_banner() {
        // Arrange
        let mut page = CatalogPage::home(CarouselConfig::default());

        // Act
        page.apply_row(0, Ok(vec![movie(1, 5.0), movie(2, 9.0), movie(3, 7.0)]));

        // Assert
        let banner = page.banner_selection().unwrap();
        assert_eq!(banner.item.id(), 1);
        assert_eq!(banner.carousel_id, BANNER_ID);
        let carousel = page.rows()[0].carousel.ready().unwrap();
        let ids: Vec<u64> = carousel.contents().iter().map(ContentItem::id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_empty_first_row_has_no_banner() {
        // Arrange
        let mut page = CatalogPage::home(CarouselConfig::default());

        // Act
        page.apply_row(0, Ok(Vec::new()));

        // Assert
        assert_eq!(page.banner(), &Loadable::Ready(None));
        assert!(page.banner_selection().is_none());
    }

    #[test]
    fn test_failed_row_does_not_block_others() {
        // Arrange
        let mut page = CatalogPage::home(CarouselConfig::default());

        // Act
        page.apply_row(1, Err(anyhow!("HTTP 503")));
        page.apply_row(2, Ok(vec![movie(7, 8.0)]));
        page.apply_row(9, Ok(vec![movie(8, 8.0)]));

        // Assert
        assert!(page.rows()[0].carousel.is_loading());
        assert!(page.rows()[1].carousel.is_loading());
        assert!(!page.rows()[2].carousel.is_loading());
        assert!(page.banner().is_loading());
        assert_eq!(page.carousels_mut().count(), 1);
    }
}
