//! Detail overlay shared by movies and shows.
//!
//! The controller renders immediately from the summary it was opened with
//! and fills in detail, credits, and one profile image per person as their
//! fetches land. None of those fetches can fail the overlay as a whole: a
//! failed slot keeps its loading indicator or placeholder.

mod model;
mod view;

use std::collections::HashMap;

use anyhow::Result;
use cineview_api::tmdb::{TmdbCredits, image_url};

pub use model::{Credit, CreditsList, DetailFull};
pub use view::{
    Avatar, CreditsView, ImageView, NO_IMAGE, OVERVIEW_FALLBACK, OverlayView, PersonView,
    RatingView, format_rating, overview_text, rating_view,
};

use crate::content::{ContentItem, ContentRef};
use crate::loadable::Loadable;
use crate::route::Route;

/// Default number of cast and of crew entries shown.
pub const DEFAULT_CREDITS_LIMIT: usize = 15;

/// Overlay tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct OverlayConfig {
    /// Entries kept per credits list.
    pub credits_limit: usize,
    /// Size token for the backdrop.
    pub backdrop_size: String,
    /// Size token for profile images.
    pub profile_size: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            credits_limit: DEFAULT_CREDITS_LIMIT,
            backdrop_size: String::from("w780"),
            profile_size: String::from("w185"),
        }
    }
}

/// What an overlay is opened with.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct OverlayRequest {
    /// Content to show.
    pub target: ContentRef,
    /// Already-known record, rendered while detail loads.
    pub summary: Option<ContentItem>,
    /// Where closing goes; defaults to the target's category root.
    pub return_route: Option<Route>,
    /// Shared visual transition id of the originating card.
    pub transition_id: Option<String>,
}

impl OverlayRequest {
    /// Request with no summary or return route.
    #[must_use]
    pub const fn new(target: ContentRef) -> Self {
        Self {
            target,
            summary: None,
            return_route: None,
            transition_id: None,
        }
    }
}

/// State of one open overlay.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OverlayController {
    request: OverlayRequest,
    config: OverlayConfig,
    detail: Loadable<DetailFull>,
    credits: Loadable<CreditsList>,
    avatars: HashMap<u64, Loadable<Option<String>>>,
}

impl OverlayController {
    /// Opens an overlay with detail and credits pending.
    ///
    /// A summary for different content than `target` is ignored.
    #[must_use]
    pub fn open(mut request: OverlayRequest, config: OverlayConfig) -> Self {
        if request
            .summary
            .as_ref()
            .is_some_and(|s| s.content_ref() != request.target)
        {
            request.summary = None;
        }
        tracing::debug!(
            kind = %request.target.kind,
            id = request.target.id,
            has_summary = request.summary.is_some(),
            "overlay opened"
        );
        Self {
            request,
            config,
            detail: Loadable::Pending,
            credits: Loadable::Pending,
            avatars: HashMap::new(),
        }
    }

    /// Content being shown.
    #[must_use]
    pub const fn target(&self) -> ContentRef {
        self.request.target
    }

    /// Detail slot.
    #[must_use]
    pub const fn detail(&self) -> &Loadable<DetailFull> {
        &self.detail
    }

    /// Credits slot.
    #[must_use]
    pub const fn credits(&self) -> &Loadable<CreditsList> {
        &self.credits
    }

    /// Stores the detail fetch result.
    pub fn apply_detail(&mut self, result: Result<DetailFull>) {
        if let Err(err) = &result {
            tracing::warn!(id = self.request.target.id, "failed to load detail: {err:#}");
        }
        self.detail = Loadable::from_result(result);
    }

    /// Stores the credits fetch result.
    ///
    /// Returns the people whose profile images should be fetched.
    pub fn apply_credits(&mut self, result: Result<TmdbCredits>) -> Vec<u64> {
        let loaded = Loadable::from_result(
            result.map(|c| CreditsList::from_tmdb(c, self.config.credits_limit)),
        );
        if let Loadable::Failed(message) = &loaded {
            tracing::warn!(id = self.request.target.id, "failed to load credits: {message}");
        }
        let ids = loaded.ready().map(CreditsList::person_ids).unwrap_or_default();
        self.avatars = ids.iter().map(|id| (*id, Loadable::Pending)).collect();
        self.credits = loaded;
        ids
    }

    /// Stores one profile image lookup. Unknown people are ignored.
    pub fn apply_person_image(&mut self, person_id: u64, result: Result<Option<String>>) {
        if let Some(slot) = self.avatars.get_mut(&person_id) {
            *slot = Loadable::from_result(result);
        }
    }

    /// Route to navigate to when closing.
    #[must_use]
    pub fn close(&self) -> Route {
        self.request
            .return_route
            .clone()
            .unwrap_or_else(|| Route::category_root(self.request.target.kind))
    }

    /// Replaces the route returned by [`OverlayController::close`].
    pub fn set_return_route(&mut self, route: Route) {
        self.request.return_route = Some(route);
    }

    /// Builds the presentation model.
    #[must_use]
    pub fn view(&self) -> OverlayView {
        let detail = self.detail.ready();
        let summary = self.request.summary.as_ref();

        let title = detail
            .map(|d| d.title.clone())
            .or_else(|| summary.map(|s| s.display_name().to_owned()))
            .unwrap_or_default();

        let image_id = match detail {
            Some(d) => d.image_id(),
            None => summary.and_then(ContentItem::image_id),
        };
        let image = image_id.map_or(ImageView::Placeholder(NO_IMAGE), |id| {
            ImageView::Image(image_url(id, Some(&self.config.backdrop_size)))
        });

        let overview = match detail {
            Some(d) => overview_text(Some(&d.overview)),
            None => overview_text(summary.map(ContentItem::overview)),
        };

        let rating = match detail {
            Some(d) => rating_view(d.vote_average, d.vote_count),
            None => summary.and_then(|s| rating_view(s.vote_average(), s.vote_count())),
        };

        OverlayView {
            kind: self.request.target.kind,
            title,
            image,
            tagline: detail.and_then(|d| d.tagline.clone()),
            genres: detail.map(|d| d.genres.clone()).unwrap_or_default(),
            facts: detail.map(|d| d.facts.clone()).unwrap_or_default(),
            rating,
            overview,
            credits: self.credits_view(),
            transition_id: self.request.transition_id.clone(),
            web_url: self.request.target.web_url(),
        }
    }

    fn credits_view(&self) -> CreditsView {
        let Some(credits) = self.credits.ready() else {
            return CreditsView::Loading;
        };
        let rows = |list: &[Credit]| -> Vec<PersonView> {
            list.iter()
                .map(|credit| PersonView {
                    person_id: credit.person_id,
                    name: credit.display_name.clone(),
                    role: credit.role_label.clone(),
                    avatar: self.avatar(credit.person_id),
                })
                .collect()
        };
        CreditsView::Ready {
            cast: rows(&credits.cast),
            crew: rows(&credits.crew),
        }
    }

    fn avatar(&self, person_id: u64) -> Avatar {
        match self.avatars.get(&person_id) {
            None | Some(Loadable::Pending) => Avatar::Loading,
            Some(Loadable::Ready(Some(path))) => {
                Avatar::Image(image_url(path, Some(&self.config.profile_size)))
            }
            Some(Loadable::Ready(None) | Loadable::Failed(_)) => Avatar::Placeholder(NO_IMAGE),
        }
    }
}
