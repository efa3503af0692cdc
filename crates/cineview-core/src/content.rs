//! Content model shared by carousels, search grids and the overlay.
//!
//! List and search payloads are classified exactly once, when they are
//! mapped from the wire types, so nothing downstream has to guess whether
//! a record is a movie or a show.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use cineview_api::tmdb::{TMDB_WEB_BASE_URL, TmdbMovie, TmdbPage, TmdbShow};

/// Which catalog a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// A feature film.
    Movie,
    /// A TV series.
    Show,
}

impl ContentKind {
    /// Route and query-string token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }

    /// Path segment used on the TMDB website.
    const fn web_segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "tv",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "show" | "tv" => Ok(Self::Show),
            other => bail!("unknown content kind: {other}"),
        }
    }
}

/// Identifies a movie or show independently of any loaded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRef {
    /// Catalog.
    pub kind: ContentKind,
    /// TMDB ID within that catalog.
    pub id: u64,
}

impl ContentRef {
    /// Reference to a movie.
    #[must_use]
    pub const fn movie(id: u64) -> Self {
        Self {
            kind: ContentKind::Movie,
            id,
        }
    }

    /// Reference to a show.
    #[must_use]
    pub const fn show(id: u64) -> Self {
        Self {
            kind: ContentKind::Show,
            id,
        }
    }

    /// Public TMDB page for this title.
    #[must_use]
    pub fn web_url(self) -> String {
        format!("{TMDB_WEB_BASE_URL}/{}/{}", self.kind.web_segment(), self.id)
    }
}

/// A movie from a list or search result.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date (`YYYY-MM-DD`).
    pub release_date: Option<String>,
    /// Overview text, possibly blank.
    pub overview: String,
    /// Backdrop image id.
    pub backdrop_path: Option<String>,
    /// Poster image id.
    pub poster_path: Option<String>,
    /// Average rating (0-10).
    pub vote_average: f64,
    /// Number of votes.
    pub vote_count: u32,
}

/// A TV series from a list or search result.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowRecord {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// First air date (`YYYY-MM-DD`).
    pub first_air_date: Option<String>,
    /// Overview text, possibly blank.
    pub overview: String,
    /// Backdrop image id.
    pub backdrop_path: Option<String>,
    /// Poster image id.
    pub poster_path: Option<String>,
    /// Average rating (0-10).
    pub vote_average: f64,
    /// Number of votes.
    pub vote_count: u32,
}

/// A catalog entry, tagged with its kind at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// Movie record.
    Movie(MovieRecord),
    /// Show record.
    Show(ShowRecord),
}

impl ContentItem {
    /// Returns `true` for movie records.
    #[must_use]
    pub const fn is_movie_record(&self) -> bool {
        matches!(self, Self::Movie(_))
    }

    /// Catalog this item belongs to.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Movie(_) => ContentKind::Movie,
            Self::Show(_) => ContentKind::Show,
        }
    }

    /// TMDB ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Show(s) => s.id,
        }
    }

    /// Kind and ID as a reference.
    #[must_use]
    pub const fn content_ref(&self) -> ContentRef {
        ContentRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    /// Title for movies, name for shows.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Show(s) => &s.name,
        }
    }

    /// Overview text as delivered (not trimmed).
    #[must_use]
    pub fn overview(&self) -> &str {
        match self {
            Self::Movie(m) => &m.overview,
            Self::Show(s) => &s.overview,
        }
    }

    /// Backdrop image id.
    #[must_use]
    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.backdrop_path.as_deref(),
            Self::Show(s) => s.backdrop_path.as_deref(),
        }
    }

    /// Poster image id.
    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Show(s) => s.poster_path.as_deref(),
        }
    }

    /// Backdrop, falling back to the poster.
    #[must_use]
    pub fn image_id(&self) -> Option<&str> {
        self.backdrop_path().or_else(|| self.poster_path())
    }

    /// Average rating.
    #[must_use]
    pub const fn vote_average(&self) -> f64 {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::Show(s) => s.vote_average,
        }
    }

    /// Number of votes.
    #[must_use]
    pub const fn vote_count(&self) -> u32 {
        match self {
            Self::Movie(m) => m.vote_count,
            Self::Show(s) => s.vote_count,
        }
    }

    /// Release year (movies) or first-air year (shows).
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        let date = match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::Show(s) => s.first_air_date.as_deref(),
        };
        parse_year(date?)
    }
}

/// Extracts the year from a TMDB `YYYY-MM-DD` date.
pub(crate) fn parse_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// TMDB sends `""` for some missing paths.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovie> for ContentItem {
    fn from(movie: TmdbMovie) -> Self {
        Self::Movie(MovieRecord {
            id: movie.id,
            title: movie.title,
            release_date: non_empty(movie.release_date),
            overview: movie.overview.unwrap_or_default(),
            backdrop_path: non_empty(movie.backdrop_path),
            poster_path: non_empty(movie.poster_path),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
        })
    }
}

impl From<TmdbShow> for ContentItem {
    fn from(show: TmdbShow) -> Self {
        Self::Show(ShowRecord {
            id: show.id,
            name: show.name,
            first_air_date: non_empty(show.first_air_date),
            overview: show.overview.unwrap_or_default(),
            backdrop_path: non_empty(show.backdrop_path),
            poster_path: non_empty(show.poster_path),
            vote_average: show.vote_average,
            vote_count: show.vote_count,
        })
    }
}

/// Maps one page of list or search results into content items, in API order.
pub fn from_page<T>(page: TmdbPage<T>) -> Vec<ContentItem>
where
    ContentItem: From<T>,
{
    page.results.into_iter().map(ContentItem::from).collect()
}
