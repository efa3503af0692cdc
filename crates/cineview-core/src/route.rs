//! Navigation routes and their path/query form.
//!
//! | Form                                   | Route                         |
//! |----------------------------------------|-------------------------------|
//! | `/`                                    | movies home                   |
//! | `/movie/{id}`                          | movies home + movie overlay   |
//! | `/show`                                | TV home                       |
//! | `/show/{id}`                           | TV home + show overlay        |
//! | `/search?keyword=K`                    | search results                |
//! | `/search?keyword=K&type=movie&id=N`    | search results + overlay      |

use std::fmt;

use unicode_normalization::UnicodeNormalization;
use url::form_urlencoded;

use crate::content::{ContentKind, ContentRef};

/// Minimum number of characters the search box accepts.
pub const MIN_KEYWORD_CHARS: usize = 2;

/// A navigable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Movies home, optionally with a movie overlay.
    Home {
        /// Movie shown in the overlay.
        movie: Option<u64>,
    },
    /// TV home, optionally with a show overlay.
    Tv {
        /// Show shown in the overlay.
        show: Option<u64>,
    },
    /// Search results for a keyword, optionally with an overlay.
    Search {
        /// Normalized keyword (may be empty).
        keyword: String,
        /// Content shown in the overlay.
        overlay: Option<ContentRef>,
    },
}

/// Page identity of a route, ignoring any overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKey {
    /// Movies home.
    Home,
    /// TV home.
    Tv,
    /// Search for this keyword.
    Search(String),
}

impl Default for Route {
    fn default() -> Self {
        Self::Home { movie: None }
    }
}

impl Route {
    /// Parses a path with optional query string.
    ///
    /// Never fails: unknown paths fall back to the movies home, and a
    /// missing, malformed, or zero id means "no overlay".
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["movie", id, ..] => Self::Home {
                movie: parse_id(id),
            },
            ["show" | "tv"] => Self::Tv { show: None },
            ["show" | "tv", id, ..] => Self::Tv { show: parse_id(id) },
            ["search", ..] => Self::parse_search(query),
            _ => Self::Home { movie: None },
        }
    }

    fn parse_search(query: &str) -> Self {
        let mut keyword = String::new();
        let mut kind = None;
        let mut id = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "keyword" => keyword = normalize_keyword(&value),
                "type" => kind = value.parse::<ContentKind>().ok(),
                "id" => id = parse_id(&value),
                _ => {}
            }
        }
        let overlay = kind.zip(id).map(|(kind, id)| ContentRef { kind, id });
        Self::Search { keyword, overlay }
    }

    /// Search route for a raw keyword.
    #[must_use]
    pub fn search(keyword: &str) -> Self {
        Self::Search {
            keyword: normalize_keyword(keyword),
            overlay: None,
        }
    }

    /// Root of the catalog `kind` belongs to.
    #[must_use]
    pub const fn category_root(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Movie => Self::Home { movie: None },
            ContentKind::Show => Self::Tv { show: None },
        }
    }

    /// Page identity.
    #[must_use]
    pub fn page_key(&self) -> PageKey {
        match self {
            Self::Home { .. } => PageKey::Home,
            Self::Tv { .. } => PageKey::Tv,
            Self::Search { keyword, .. } => PageKey::Search(keyword.clone()),
        }
    }

    /// Content the overlay should show, if any.
    #[must_use]
    pub const fn overlay_target(&self) -> Option<ContentRef> {
        match self {
            Self::Home { movie } => match movie {
                Some(id) => Some(ContentRef::movie(*id)),
                None => None,
            },
            Self::Tv { show } => match show {
                Some(id) => Some(ContentRef::show(*id)),
                None => None,
            },
            Self::Search { overlay, .. } => *overlay,
        }
    }

    /// Same page with the overlay removed.
    #[must_use]
    pub fn without_overlay(&self) -> Self {
        match self {
            Self::Home { .. } => Self::Home { movie: None },
            Self::Tv { .. } => Self::Tv { show: None },
            Self::Search { keyword, .. } => Self::Search {
                keyword: keyword.clone(),
                overlay: None,
            },
        }
    }

    /// Detail route for `target` opened from this page.
    ///
    /// Search keeps its keyword; the catalog pages route by the target's kind.
    #[must_use]
    pub fn with_overlay(&self, target: ContentRef) -> Self {
        match self {
            Self::Search { keyword, .. } => Self::Search {
                keyword: keyword.clone(),
                overlay: Some(target),
            },
            Self::Home { .. } | Self::Tv { .. } => match target.kind {
                ContentKind::Movie => Self::Home {
                    movie: Some(target.id),
                },
                ContentKind::Show => Self::Tv {
                    show: Some(target.id),
                },
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home { movie: None } => f.write_str("/"),
            Self::Home { movie: Some(id) } => write!(f, "/movie/{id}"),
            Self::Tv { show: None } => f.write_str("/show"),
            Self::Tv { show: Some(id) } => write!(f, "/show/{id}"),
            Self::Search { keyword, overlay } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                query.append_pair("keyword", keyword);
                if let Some(target) = overlay {
                    query.append_pair("type", target.kind.as_str());
                    query.append_pair("id", &target.id.to_string());
                }
                write!(f, "/search?{}", query.finish())
            }
        }
    }
}

/// Positive decimal id, or `None`.
fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

/// NFKC-normalizes, trims, and collapses internal whitespace.
#[must_use]
pub fn normalize_keyword(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the search box should accept `raw`.
#[must_use]
pub fn is_valid_keyword(raw: &str) -> bool {
    normalize_keyword(raw).chars().count() >= MIN_KEYWORD_CHARS
}
