//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! catalog lists, movie/series details, credits, person images, and
//! search results.

mod api;
mod client;
mod image;
mod metrics;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use image::{DEFAULT_IMAGE_SIZE, IMAGE_BASE_URL, image_url};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    ListParams, MovieList, SearchMovieParams, SearchTvParams, TmdbCastMember, TmdbCredits,
    TmdbCrewMember, TmdbGenre, TmdbImage, TmdbMovie, TmdbMovieDetails, TmdbPage,
    TmdbPersonImages, TmdbShow, TmdbShowDetails, TvList,
};

/// Base URL of the TMDB website (not the API).
pub const TMDB_WEB_BASE_URL: &str = "https://www.themoviedb.org";
