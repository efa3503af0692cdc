//! Router layer: the current route, the mounted page and overlay, and
//! the channel their fetches report into.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cineview_api::tmdb::{ListParams, TmdbApi};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::instrument;

use crate::carousel::CarouselConfig;
use crate::content::{ContentKind, ContentRef};
use crate::fetch::{Envelope, FetchEvent, FetchScope, MountId, MountIds};
use crate::overlay::{DetailFull, OverlayConfig, OverlayController, OverlayRequest};
use crate::pages::Page;
use crate::route::{PageKey, Route};
use crate::selection::{Selection, SelectionStore};

/// Browser tuning.
#[derive(Debug, Clone, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserConfig {
    /// Carousel paging.
    pub carousel: CarouselConfig,
    /// Overlay limits and image sizes.
    pub overlay: OverlayConfig,
    /// Language and region sent with every list query.
    pub list: ListParams,
}

#[derive(Debug)]
struct MountedPage {
    key: PageKey,
    page: Page,
    scope: FetchScope,
}

#[derive(Debug)]
struct MountedOverlay {
    controller: OverlayController,
    scope: FetchScope,
}

/// Composes pages, the overlay, and the selection store behind a route.
#[derive(Debug)]
pub struct Browser<A> {
    api: Arc<A>,
    config: BrowserConfig,
    route: Route,
    page: Option<MountedPage>,
    overlay: Option<MountedOverlay>,
    selection: SelectionStore,
    mount_ids: MountIds,
    sender: UnboundedSender<Envelope>,
    receiver: UnboundedReceiver<Envelope>,
}

impl<A> Browser<A>
where
    A: TmdbApi + Sync + 'static,
{
    /// Creates a browser with nothing mounted. Call [`Browser::navigate`] next.
    #[must_use]
    pub fn new(api: Arc<A>, config: BrowserConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            api,
            config,
            route: Route::default(),
            page: None,
            overlay: None,
            selection: SelectionStore::new(),
            mount_ids: MountIds::default(),
            sender,
            receiver,
        }
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Mounted page.
    #[must_use]
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref().map(|m| &m.page)
    }

    /// Mounted page, for carousel paging.
    pub fn page_mut(&mut self) -> Option<&mut Page> {
        self.page.as_mut().map(|m| &mut m.page)
    }

    /// Open overlay.
    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayController> {
        self.overlay.as_ref().map(|m| &m.controller)
    }

    /// Selection store.
    #[must_use]
    pub const fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Mount id of the page, if one is mounted.
    #[must_use]
    pub fn page_mount(&self) -> Option<MountId> {
        self.page.as_ref().map(|m| m.scope.mount_id())
    }

    /// Mount id of the overlay, if one is open.
    #[must_use]
    pub fn overlay_mount(&self) -> Option<MountId> {
        self.overlay.as_ref().map(|m| m.scope.mount_id())
    }

    /// Moves to `route`.
    ///
    /// Remounts the page only when the page identity changes (a different
    /// catalog or a different search keyword). Opens, keeps, or closes the
    /// overlay to match the route.
    #[instrument(skip_all, fields(route = %route))]
    pub fn navigate(&mut self, route: Route) {
        let key = route.page_key();
        if self.page.as_ref().is_none_or(|m| m.key != key) {
            self.mount_page(&route, key);
        }

        match route.overlay_target() {
            Some(target) => match self.overlay.as_mut() {
                Some(mounted) if mounted.controller.target() == target => {
                    // The page under the overlay may have changed.
                    mounted.controller.set_return_route(route.without_overlay());
                    self.selection.take_for(target);
                }
                _ => self.open_overlay(&route, target),
            },
            None => {
                if self.overlay.take().is_some() {
                    tracing::debug!("overlay unmounted");
                }
            }
        }

        self.route = route;
    }

    /// Records a click and opens its overlay within the current page.
    pub fn select(&mut self, selection: Selection) {
        let route = self.route.with_overlay(selection.target());
        self.selection.record(selection);
        self.navigate(route);
    }

    /// Closes the overlay and forgets the selection.
    ///
    /// Returns the route navigated to, or `None` if no overlay was open.
    pub fn close_overlay(&mut self) -> Option<Route> {
        let mounted = self.overlay.take()?;
        let route = mounted.controller.close();
        drop(mounted);
        self.selection.clear();
        self.navigate(route.clone());
        Some(route)
    }

    fn mount_page(&mut self, route: &Route, key: PageKey) {
        let mount = self.mount_ids.issue();
        let mut scope = FetchScope::new(mount, self.sender.clone());
        let page = Page::for_route(route, self.config.carousel);
        page.spawn_fetches(&self.api, &self.config.list, &mut scope);
        tracing::debug!(mount = mount.get(), "page mounted");
        // Replacing the old page drops its scope and aborts its fetches.
        self.page = Some(MountedPage { key, page, scope });
    }

    fn open_overlay(&mut self, route: &Route, target: ContentRef) {
        let selection = self.selection.take_for(target);
        let request = OverlayRequest {
            target,
            transition_id: selection.as_ref().map(Selection::transition_id),
            summary: selection.map(|s| s.item),
            return_route: Some(route.without_overlay()),
        };
        let controller = OverlayController::open(request, self.config.overlay.clone());

        let mount = self.mount_ids.issue();
        let mut scope = FetchScope::new(mount, self.sender.clone());
        let language = self.config.list.language.clone();

        let api = Arc::clone(&self.api);
        let detail_language = language.clone();
        scope.spawn(async move {
            FetchEvent::Detail(fetch_detail(api.as_ref(), target, &detail_language).await)
        });

        let api = Arc::clone(&self.api);
        scope.spawn(async move {
            let result = match target.kind {
                ContentKind::Movie => api.movie_credits(target.id, &language).await,
                ContentKind::Show => api.tv_credits(target.id, &language).await,
            };
            FetchEvent::Credits(
                result.with_context(|| format!("failed to fetch credits for {target:?}")),
            )
        });

        self.overlay = Some(MountedOverlay { controller, scope });
    }

    /// Delivers one fetch result.
    ///
    /// Returns `false` when the result belongs to a page or overlay that is
    /// no longer mounted; such results are discarded.
    pub fn apply(&mut self, envelope: Envelope) -> bool {
        let Envelope { mount, event } = envelope;

        if let Some(mounted) = self.page.as_mut().filter(|m| m.scope.mount_id() == mount) {
            return match event {
                FetchEvent::Row { row, result } => {
                    mounted.page.apply_row(row, result);
                    true
                }
                other => {
                    tracing::debug!(?other, "ignoring non-row event for page");
                    false
                }
            };
        }

        if let Some(mounted) = self.overlay.as_mut().filter(|m| m.scope.mount_id() == mount) {
            match event {
                FetchEvent::Detail(result) => mounted.controller.apply_detail(result),
                FetchEvent::Credits(result) => {
                    for person_id in mounted.controller.apply_credits(result) {
                        let api = Arc::clone(&self.api);
                        mounted.scope.spawn(async move {
                            let result = api
                                .person_images(person_id)
                                .await
                                .map(|images| images.profiles.into_iter().next())
                                .map(|profile| profile.map(|p| p.file_path));
                            FetchEvent::PersonImage { person_id, result }
                        });
                    }
                }
                FetchEvent::PersonImage { person_id, result } => {
                    mounted.controller.apply_person_image(person_id, result);
                }
                FetchEvent::Row { .. } => {
                    tracing::debug!("ignoring row event for overlay");
                    return false;
                }
            }
            return true;
        }

        tracing::debug!(mount = mount.get(), "discarding stale fetch result");
        false
    }

    /// Applies every queued result without waiting. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0usize;
        while let Ok(envelope) = self.receiver.try_recv() {
            if self.apply(envelope) {
                applied = applied.saturating_add(1);
            }
        }
        applied
    }

    /// Waits for the next fetch result.
    pub async fn next_event(&mut self) -> Option<Envelope> {
        self.receiver.recv().await
    }

    /// Runs the carousel timeout checks.
    pub fn tick(&mut self, now: Instant) {
        if let Some(page) = self.page_mut() {
            page.tick(now);
        }
    }
}

async fn fetch_detail<A>(api: &A, target: ContentRef, language: &str) -> Result<DetailFull>
where
    A: TmdbApi + Sync,
{
    let detail = match target.kind {
        ContentKind::Movie => api
            .movie_details(target.id, language)
            .await
            .map(DetailFull::from),
        ContentKind::Show => api.tv_details(target.id, language).await.map(DetailFull::from),
    };
    detail.with_context(|| format!("failed to fetch detail for {target:?}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]
    #![allow(clippy::unreachable)]

    use std::time::Duration;

    use super::*;
    use crate::loadable::Loadable;
    use crate::overlay::{Avatar, CreditsView};
    use crate::pages::{CatalogPage, GridStatus};
    use crate::testing::{MockApi, movie};

    fn browser(api: MockApi) -> Browser<MockApi> {
        Browser::new(Arc::new(api), BrowserConfig::default())
    }

    /// Applies results until `done` holds, failing after a second.
    async fn pump_until<A, F>(browser: &mut Browser<A>, mut done: F)
    where
        A: TmdbApi + Sync + 'static,
        F: FnMut(&Browser<A>) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !done(browser) {
                let envelope = browser.next_event().await.unwrap();
                browser.apply(envelope);
            }
        })
        .await
        .unwrap();
    }

    fn catalog<A>(browser: &Browser<A>) -> &CatalogPage
    where
        A: TmdbApi + Sync + 'static,
    {
        match browser.page() {
            Some(Page::Catalog(page)) => page,
            other => panic!("expected catalog page, got {other:?}"),
        }
    }

    fn rows_loaded<A>(browser: &Browser<A>) -> bool
    where
        A: TmdbApi + Sync + 'static,
    {
        matches!(browser.page(), Some(Page::Catalog(page))
            if page.rows().iter().all(|r| !matches!(r.carousel, Loadable::Pending)))
    }

    #[tokio::test]
    async fn test_home_loads_banner_and_rows() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::parse("/"));
        pump_until(&mut browser, rows_loaded).await;

        // Assert
        let page = catalog(&browser);
        assert_eq!(page.banner_selection().unwrap().item.id(), 603);
        let first = page.rows()[0].carousel.ready().unwrap();
        assert_eq!(first.contents().len(), 5);
        assert!(page.rows().iter().all(|r| r.carousel.ready().is_some()));
    }

    #[tokio::test]
    async fn test_failed_row_stays_loading() {
        // Arrange
        let mut browser = browser(MockApi::failing("movie/popular"));

        // Act
        browser.navigate(Route::parse("/"));
        pump_until(&mut browser, rows_loaded).await;

        // Assert
        let page = catalog(&browser);
        assert!(page.rows()[1].carousel.is_loading());
        assert!(page.rows()[0].carousel.ready().is_some());
        assert!(page.rows()[3].carousel.ready().is_some());
    }

    #[tokio::test]
    async fn test_select_opens_overlay_with_summary() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/"));
        pump_until(&mut browser, rows_loaded).await;
        let selection = catalog(&browser).rows()[1]
            .carousel
            .ready()
            .unwrap()
            .select(0)
            .unwrap();
        let expected_title = selection.item.display_name().to_owned();
        let page_mount = browser.page_mount();

        // Act
        browser.select(selection);

        // Assert
        assert_eq!(browser.page_mount(), page_mount);
        let overlay = browser.overlay().unwrap();
        let view = overlay.view();
        assert_eq!(view.title, expected_title);
        assert_eq!(
            view.transition_id.as_deref(),
            Some(format!("slider_popular_backdrop_{}", overlay.target().id).as_str())
        );
        assert!(matches!(browser.route(), Route::Home { movie: Some(_) }));
    }

    #[tokio::test]
    async fn test_overlay_loads_detail_credits_and_profiles() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::parse("/movie/603"));
        pump_until(&mut browser, |b| {
            let Some(overlay) = b.overlay() else {
                return false;
            };
            match overlay.view().credits {
                CreditsView::Ready { cast, crew } => cast
                    .iter()
                    .chain(&crew)
                    .all(|p| p.avatar != Avatar::Loading),
                CreditsView::Loading => false,
            }
        })
        .await;

        // Assert
        let view = browser.overlay().unwrap().view();
        assert_eq!(view.title, "The Matrix");
        let CreditsView::Ready { cast, .. } = view.credits else {
            unreachable!("checked above");
        };
        assert_eq!(
            cast[0].avatar,
            Avatar::Image(String::from(
                "https://image.tmdb.org/t/p/w185/4D0PpNI0kmP58hgrwGC3wCjxhnm.jpg"
            ))
        );
        assert_eq!(cast[1].avatar, Avatar::Placeholder("no image"));
    }

    #[tokio::test]
    async fn test_show_overlay_loads_detail_credits_and_profiles() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::parse("/show/1399"));
        pump_until(&mut browser, |b| {
            let Some(overlay) = b.overlay() else {
                return false;
            };
            overlay.detail().ready().is_some()
                && match overlay.view().credits {
                    CreditsView::Ready { cast, crew } => cast
                        .iter()
                        .chain(&crew)
                        .all(|p| p.avatar != Avatar::Loading),
                    CreditsView::Loading => false,
                }
        })
        .await;

        // Assert
        assert!(matches!(browser.page(), Some(Page::Catalog(_))));
        assert_eq!(browser.route(), &Route::Tv { show: Some(1399) });
        let view = browser.overlay().unwrap().view();
        assert_eq!(view.title, "Game of Thrones");
        let CreditsView::Ready { cast, crew } = view.credits else {
            unreachable!("checked above");
        };
        assert_eq!(cast.len(), 2);
        assert_eq!(cast[0].role, "Daenerys Targaryen");
        assert_eq!(crew.len(), 1);
        assert_eq!(crew[0].name, "David Benioff");
        assert_eq!(crew[0].role, "Writing");
        assert!(
            cast.iter()
                .chain(&crew)
                .all(|p| p.avatar == Avatar::Placeholder("no image"))
        );
    }

    #[tokio::test]
    async fn test_same_overlay_on_new_page_closes_to_new_page() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/movie/603"));
        let overlay_mount = browser.overlay_mount();

        // Act
        browser.navigate(Route::parse("/search?keyword=matrix&type=movie&id=603"));
        let kept_mount = browser.overlay_mount();
        let route = browser.close_overlay();

        // Assert
        assert_eq!(kept_mount, overlay_mount);
        assert_eq!(route.unwrap().to_string(), "/search?keyword=matrix");
        assert!(matches!(browser.page(), Some(Page::Search(p)) if p.keyword() == "matrix"));
        assert!(browser.overlay().is_none());
    }

    #[tokio::test]
    async fn test_selecting_open_overlay_consumes_selection() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/movie/603"));
        let overlay_mount = browser.overlay_mount();

        // Act
        browser.select(Selection::new("popular", movie(603, 8.2)));

        // Assert
        assert_eq!(browser.overlay_mount(), overlay_mount);
        assert!(browser.selection().peek().is_none());
    }

    #[tokio::test]
    async fn test_close_overlay_clears_selection() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/show"));
        browser.select(Selection::new("popular", movie(42, 7.0)));

        // Act
        let route = browser.close_overlay();

        // Assert
        assert_eq!(route, Some(Route::Home { movie: None }));
        assert!(browser.overlay().is_none());
        assert!(browser.selection().peek().is_none());
        assert_eq!(browser.route(), &Route::Home { movie: None });
    }

    #[tokio::test]
    async fn test_close_without_overlay_is_noop() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/show"));

        // Act & Assert
        assert!(browser.close_overlay().is_none());
        assert_eq!(browser.route(), &Route::Tv { show: None });
    }

    #[tokio::test]
    async fn test_search_deep_link_closes_to_search() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::parse("/search?keyword=matrix&type=movie&id=603"));
        let route = browser.close_overlay();

        // Assert
        assert_eq!(route.unwrap().to_string(), "/search?keyword=matrix");
        assert!(matches!(browser.page(), Some(Page::Search(p)) if p.keyword() == "matrix"));
    }

    #[tokio::test]
    async fn test_search_grids() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::search("matrix"));
        pump_until(&mut browser, |b| {
            matches!(b.page(), Some(Page::Search(p))
                if p.grids().iter().all(|g| g.status() != GridStatus::Searching))
        })
        .await;

        // Assert
        let Some(Page::Search(page)) = browser.page() else {
            unreachable!("checked above");
        };
        assert!(matches!(
            page.grids()[0].status(),
            GridStatus::Results(items) if items[0].id() == 603
        ));
        assert_eq!(page.grids()[1].status(), GridStatus::NoResults);
    }

    #[tokio::test]
    async fn test_empty_search_does_not_fetch() {
        // Arrange
        let mut browser = browser(MockApi::default());

        // Act
        browser.navigate(Route::search("   "));
        tokio::task::yield_now().await;

        // Assert
        assert_eq!(browser.drain(), 0);
        assert!(matches!(browser.page(), Some(Page::Search(p)) if p.is_prompt()));
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/"));
        let old_mount = browser.page_mount().unwrap();

        // Act
        browser.navigate(Route::parse("/show"));
        let applied = browser.apply(Envelope {
            mount: old_mount,
            event: FetchEvent::Row {
                row: 0,
                result: Ok(vec![movie(1, 9.0)]),
            },
        });

        // Assert
        assert!(!applied);
        assert_ne!(browser.page_mount(), Some(old_mount));
        assert!(catalog(&browser).banner().is_loading());
    }

    #[tokio::test]
    async fn test_stale_overlay_results_are_discarded() {
        // Arrange
        let mut browser = browser(MockApi::default());
        browser.navigate(Route::parse("/movie/603"));
        let old_overlay = browser.overlay_mount().unwrap();

        // Act
        browser.navigate(Route::parse("/movie/604"));
        let applied = browser.apply(Envelope {
            mount: old_overlay,
            event: FetchEvent::Detail(Err(anyhow::anyhow!("late"))),
        });

        // Assert
        assert!(!applied);
        assert_eq!(browser.overlay().unwrap().target(), ContentRef::movie(604));
    }

    #[tokio::test]
    async fn test_tick_settles_stuck_carousel() {
        // Arrange
        let config = BrowserConfig {
            carousel: CarouselConfig {
                page_size: 2,
                ..CarouselConfig::default()
            },
            ..BrowserConfig::default()
        };
        let mut browser = Browser::new(Arc::new(MockApi::default()), config);
        browser.navigate(Route::parse("/"));
        pump_until(&mut browser, rows_loaded).await;
        let start = Instant::now();
        let carousel = browser.page_mut().unwrap().carousels_mut().next().unwrap();
        carousel.advance(start).unwrap();

        // Act
        browser.tick(start + Duration::from_secs(3));

        // Assert
        let carousel = browser.page_mut().unwrap().carousels_mut().next().unwrap();
        assert_eq!(carousel.page_index(), 1);
        assert!(!carousel.is_transitioning());
    }
}
