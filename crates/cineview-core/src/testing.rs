//! Test helpers: record builders and a fixture-backed `TmdbApi`.
#![allow(clippy::unwrap_used)]

use anyhow::{Result, bail};
use cineview_api::tmdb::{
    ListParams, MovieList, SearchMovieParams, SearchTvParams, TmdbApi, TmdbCredits, TmdbMovie,
    TmdbMovieDetails, TmdbPage, TmdbPersonImages, TmdbShow, TmdbShowDetails, TvList,
};

use crate::content::{ContentItem, MovieRecord, ShowRecord};

/// Movie with the given id and rating.
pub fn movie(id: u64, vote_average: f64) -> ContentItem {
    ContentItem::Movie(MovieRecord {
        id,
        title: format!("Movie {id}"),
        release_date: None,
        overview: String::new(),
        backdrop_path: None,
        poster_path: None,
        vote_average,
        vote_count: 10,
    })
}

/// Show with the given id and rating.
pub fn show(id: u64, vote_average: f64) -> ContentItem {
    ContentItem::Show(ShowRecord {
        id,
        name: format!("Show {id}"),
        first_air_date: None,
        overview: String::new(),
        backdrop_path: None,
        poster_path: None,
        vote_average,
        vote_count: 10,
    })
}

/// Serves the JSON fixtures; endpoints listed in `failing` return an error.
#[derive(Debug, Default)]
pub struct MockApi {
    /// Endpoint paths (e.g. `movie/popular`, `credits`) that fail.
    pub failing: Vec<&'static str>,
}

impl MockApi {
    /// Mock where `endpoint` fails.
    pub fn failing(endpoint: &'static str) -> Self {
        Self {
            failing: vec![endpoint],
        }
    }

    fn check(&self, endpoint: &str) -> Result<()> {
        if self.failing.iter().any(|f| *f == endpoint) {
            bail!("TMDB API error (HTTP 503): {endpoint}");
        }
        Ok(())
    }
}

impl TmdbApi for MockApi {
    async fn movie_list(
        &self,
        list: MovieList,
        _params: &ListParams,
    ) -> Result<TmdbPage<TmdbMovie>> {
        self.check(list.path())?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/movie_now_playing.json"
        ))
        .unwrap())
    }

    async fn tv_list(&self, list: TvList, _params: &ListParams) -> Result<TmdbPage<TmdbShow>> {
        self.check(list.path())?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/tv_popular.json"
        ))
        .unwrap())
    }

    async fn movie_details(&self, _movie_id: u64, _language: &str) -> Result<TmdbMovieDetails> {
        self.check("details")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/movie_details_603.json"
        ))
        .unwrap())
    }

    async fn movie_credits(&self, _movie_id: u64, _language: &str) -> Result<TmdbCredits> {
        self.check("credits")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/movie_credits_603.json"
        ))
        .unwrap())
    }

    async fn tv_details(&self, _series_id: u64, _language: &str) -> Result<TmdbShowDetails> {
        self.check("details")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/tv_details_1399.json"
        ))
        .unwrap())
    }

    async fn tv_credits(&self, _series_id: u64, _language: &str) -> Result<TmdbCredits> {
        self.check("credits")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/tv_credits_1399.json"
        ))
        .unwrap())
    }

    async fn person_images(&self, person_id: u64) -> Result<TmdbPersonImages> {
        self.check("person")?;
        if person_id == 6384 {
            return Ok(serde_json::from_str(include_str!(
                "../../../fixtures/tmdb/person_images_6384.json"
            ))
            .unwrap());
        }
        Ok(TmdbPersonImages {
            id: person_id,
            profiles: Vec::new(),
        })
    }

    async fn search_movie(&self, _params: &SearchMovieParams) -> Result<TmdbPage<TmdbMovie>> {
        self.check("search/movie")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/search_movie_matrix.json"
        ))
        .unwrap())
    }

    async fn search_tv(&self, _params: &SearchTvParams) -> Result<TmdbPage<TmdbShow>> {
        self.check("search/tv")?;
        Ok(serde_json::from_str(include_str!(
            "../../../fixtures/tmdb/search_tv_empty.json"
        ))
        .unwrap())
    }
}
