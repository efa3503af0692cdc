//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    ListParams, MovieList, SearchMovieParams, SearchTvParams, TmdbCredits, TmdbMovie,
    TmdbMovieDetails, TmdbPage, TmdbPersonImages, TmdbShow, TmdbShowDetails, TvList,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// the `Send` variant is the one fetch tasks are spawned against.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches page 1 of a movie catalog list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_list(&self, list: MovieList, params: &ListParams) -> Result<TmdbPage<TmdbMovie>>;

    /// Fetches page 1 of a TV catalog list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_list(&self, list: TvList, params: &ListParams) -> Result<TmdbPage<TmdbShow>>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64, language: &str) -> Result<TmdbMovieDetails>;

    /// Fetches movie cast and crew.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_credits(&self, movie_id: u64, language: &str) -> Result<TmdbCredits>;

    /// Fetches TV series details.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_details(&self, series_id: u64, language: &str) -> Result<TmdbShowDetails>;

    /// Fetches TV series cast and crew.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_credits(&self, series_id: u64, language: &str) -> Result<TmdbCredits>;

    /// Fetches profile images for a person.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn person_images(&self, person_id: u64) -> Result<TmdbPersonImages>;

    /// Searches for movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbPage<TmdbMovie>>;

    /// Searches for TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TmdbPage<TmdbShow>>;
}
