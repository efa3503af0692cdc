//! TMDB API response types and query parameters.

use serde::Deserialize;

// --- Paged results ---

/// A single page of results from a list or search endpoint.
///
/// Only page 1 is ever requested; the pagination totals are kept for
/// display but never followed.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number.
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- List / search items ---

/// A movie as it appears in list and search results.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// A TV series as it appears in list and search results.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// First air date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

// --- Details ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `movie/{movie_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Tagline (often empty).
    #[serde(default)]
    pub tagline: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
}

/// Response from `tv/{series_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbShowDetails {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Tagline (often empty).
    #[serde(default)]
    pub tagline: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
}

// --- Credits ---

/// Response from `movie/{id}/credits` and `tv/{id}/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    /// Movie or series ID.
    #[serde(default)]
    pub id: u64,
    /// Cast in billing order.
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    /// Crew in API order.
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

/// A cast entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    /// Person ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Department the person is known for.
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A crew entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    /// Person ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Job on this production (e.g. "Director").
    #[serde(default)]
    pub job: Option<String>,
    /// Department on this production.
    #[serde(default)]
    pub department: Option<String>,
    /// Department the person is known for.
    #[serde(default)]
    pub known_for_department: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Person images ---

/// Response from `person/{person_id}/images`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonImages {
    /// Person ID.
    #[serde(default)]
    pub id: u64,
    /// Profile images, best first.
    #[serde(default)]
    pub profiles: Vec<TmdbImage>,
}

/// A single image descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImage {
    /// Image path, to be combined with a size token.
    pub file_path: String,
    /// Pixel width.
    #[serde(default)]
    pub width: u32,
    /// Pixel height.
    #[serde(default)]
    pub height: u32,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Catalog lists ---

/// Movie catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieList {
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/upcoming`.
    Upcoming,
}

impl MovieList {
    /// All lists in display order.
    pub const ALL: [Self; 4] = [Self::NowPlaying, Self::Popular, Self::TopRated, Self::Upcoming];

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::Popular => "movie/popular",
            Self::TopRated => "movie/top_rated",
            Self::Upcoming => "movie/upcoming",
        }
    }
}

/// TV catalog lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TvList {
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/airing_today`.
    AiringToday,
    /// `tv/popular`.
    Popular,
    /// `tv/top_rated`.
    TopRated,
}

impl TvList {
    /// All lists in display order.
    pub const ALL: [Self; 4] = [Self::OnTheAir, Self::AiringToday, Self::Popular, Self::TopRated];

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::OnTheAir => "tv/on_the_air",
            Self::AiringToday => "tv/airing_today",
            Self::Popular => "tv/popular",
            Self::TopRated => "tv/top_rated",
        }
    }
}

// --- Parameters ---

/// Parameters shared by the catalog list endpoints.
#[derive(Debug, Clone)]
pub struct ListParams {
    /// Response language (default: "en-US").
    pub language: String,
    /// Region filter (ISO 3166-1).
    pub region: Option<String>,
    /// Result page (default: 1).
    pub page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            language: String::from("en-US"),
            region: None,
            page: 1,
        }
    }
}

impl ListParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the region filter.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Parameters for `search/tv` endpoint.
#[derive(Debug, Clone)]
pub struct SearchTvParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by first air date year.
    pub first_air_date_year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchTvParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            first_air_date_year: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the first air date year filter.
    #[must_use]
    pub const fn first_air_date_year(mut self, year: u32) -> Self {
        self.first_air_date_year = Some(year);
        self
    }
}

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by primary release year.
    pub primary_release_year: Option<u32>,
    /// Region filter (ISO 3166-1).
    pub region: Option<String>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            primary_release_year: None,
            region: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the primary release year filter.
    #[must_use]
    pub const fn primary_release_year(mut self, year: u32) -> Self {
        self.primary_release_year = Some(year);
        self
    }

    /// Sets the region filter.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}
