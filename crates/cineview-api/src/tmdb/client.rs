//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::metrics::record_request;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    ListParams, MovieList, SearchMovieParams, SearchTvParams, TmdbCredits, TmdbErrorResponse,
    TmdbMovie, TmdbMovieDetails, TmdbPage, TmdbPersonImages, TmdbShow, TmdbShowDetails, TvList,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How requests are authenticated.
#[derive(Clone)]
enum Credentials {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token, sent as a bearer `Authorization` header.
    Bearer(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Request credentials.
    credentials: Credentials,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Authenticates with a v3 API key (`api_key` query parameter).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::ApiKey(key.into()));
        self
    }

    /// Authenticates with a v4 bearer token.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - neither `api_key` nor `api_token` is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let credentials = self
            .credentials
            .context("api_key or api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            credentials,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Waits for the next rate-limiter slot without holding the lock while sleeping.
    async fn throttle(&self) {
        let delay = self.rate_limiter.lock().await.reserve(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Sends a GET request with credentials, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    ///
    /// `endpoint` is a low-cardinality label for the request counter.
    #[instrument(skip_all, fields(endpoint = endpoint))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.throttle().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let mut builder = self.http_client.get(url.clone()).query(query);
            builder = match &self.credentials {
                Credentials::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
                Credentials::Bearer(token) => builder.bearer_auth(token),
            };
            let request = builder
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(endpoint, path, "TMDB API request");

            let result = self.http_client.execute(request).await;
            let response = result.with_context(|| format!("request failed: {path}"))?;

            let status = response.status();
            record_request(endpoint, status.as_u16());

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.throttle().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {}): code={}, message={}",
                        status,
                        error_response.status_code,
                        error_response.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            let parsed =
                raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
            return Ok(parsed);
        }
    }
}

/// Builds the query for the catalog list endpoints.
fn list_query(params: &ListParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("language", params.language.clone()),
        ("page", params.page.to_string()),
    ];
    if let Some(ref region) = params.region {
        query.push(("region", region.clone()));
    }
    query
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all, fields(list = list.path()))]
    async fn movie_list(
        &self,
        list: MovieList,
        params: &ListParams,
    ) -> Result<TmdbPage<TmdbMovie>> {
        self.get_json("movie_list", list.path(), &list_query(params))
            .await
    }

    #[instrument(skip_all, fields(list = list.path()))]
    async fn tv_list(&self, list: TvList, params: &ListParams) -> Result<TmdbPage<TmdbShow>> {
        self.get_json("tv_list", list.path(), &list_query(params))
            .await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_details(&self, movie_id: u64, language: &str) -> Result<TmdbMovieDetails> {
        let path = format!("movie/{movie_id}");
        let query = [("language", String::from(language))];
        self.get_json("movie_details", &path, &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_credits(&self, movie_id: u64, language: &str) -> Result<TmdbCredits> {
        let path = format!("movie/{movie_id}/credits");
        let query = [("language", String::from(language))];
        self.get_json("movie_credits", &path, &query).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_details(&self, series_id: u64, language: &str) -> Result<TmdbShowDetails> {
        let path = format!("tv/{series_id}");
        let query = [("language", String::from(language))];
        self.get_json("tv_details", &path, &query).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_credits(&self, series_id: u64, language: &str) -> Result<TmdbCredits> {
        let path = format!("tv/{series_id}/credits");
        let query = [("language", String::from(language))];
        self.get_json("tv_credits", &path, &query).await
    }

    #[instrument(skip_all, fields(person_id = person_id))]
    async fn person_images(&self, person_id: u64) -> Result<TmdbPersonImages> {
        let path = format!("person/{person_id}/images");
        self.get_json("person_images", &path, &[]).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbPage<TmdbMovie>> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.primary_release_year {
            query.push(("primary_release_year", year.to_string()));
        }
        if let Some(ref region) = params.region {
            query.push(("region", region.clone()));
        }

        self.get_json("search_movie", "search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TmdbPage<TmdbShow>> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.first_air_date_year {
            query.push(("first_air_date_year", year.to_string()));
        }

        self.get_json("search_tv", "search/tv", &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    /// Builds a client pointed at the mock server with rate limiting disabled.
    fn mock_client(server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_credentials() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key or api_token is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url.clone())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_debug_output_redacts_credentials() {
        // Arrange
        let client = TmdbClient::builder()
            .api_key("super-secret")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let debug = format!("{client:?}");

        // Assert
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_parse_now_playing_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_now_playing.json");

        // Act
        let response: TmdbPage<TmdbMovie> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.results.len(), 6);
        let first = &response.results[0];
        assert_eq!(first.id, 603);
        assert_eq!(first.title, "The Matrix");
        assert!(response.results[5].backdrop_path.is_none());
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_603.json");

        // Act
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 603);
        assert_eq!(details.tagline.as_deref(), Some("Welcome to the Real World."));
        assert_eq!(details.genres.len(), 2);
        assert!(details.vote_count > 0);
    }

    #[test]
    fn test_parse_credits_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_credits_603.json");

        // Act
        let credits: TmdbCredits = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(credits.id, 603);
        assert_eq!(credits.cast[0].name, "Keanu Reeves");
        assert_eq!(credits.cast[0].character.as_deref(), Some("Neo"));
        assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: TmdbShowDetails = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 1399);
        assert_eq!(details.name, "Game of Thrones");
        assert_eq!(details.number_of_seasons, Some(8));
    }

    #[test]
    fn test_parse_person_images_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/person_images_6384.json");

        // Act
        let images: TmdbPersonImages = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(images.id, 6384);
        assert_eq!(images.profiles[0].file_path, "/4D0PpNI0kmP58hgrwGC3wCjxhnm.jpg");
    }

    #[test]
    fn test_parse_search_tv_empty_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        // Act
        let response: TmdbPage<TmdbShow> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.total_results, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_movie_list_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_now_playing.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/now_playing"))
            .and(wiremock::matchers::query_param("language", "ko"))
            .and(wiremock::matchers::query_param("region", "KR"))
            .and(wiremock::matchers::query_param("page", "1"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let params = ListParams::default().language("ko").region("KR");

        // Act
        let response = client
            .movie_list(MovieList::NowPlaying, &params)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.results[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_tv_list_uses_airing_today_path() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/tv_popular.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/airing_today"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let response = client
            .tv_list(TvList::AiringToday, &ListParams::default())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.results[0].name, "Game of Thrones");
    }

    #[tokio::test]
    async fn test_movie_details_and_credits_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let details_body = include_str!("../../../../fixtures/tmdb/movie_details_603.json");
        let credits_body = include_str!("../../../../fixtures/tmdb/movie_credits_603.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/603"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(details_body))
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/603/credits"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(credits_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let details = client.movie_details(603, "en-US").await.unwrap();
        let credits = client.movie_credits(603, "en-US").await.unwrap();

        // Assert
        assert_eq!(details.title, "The Matrix");
        assert!(!credits.cast.is_empty());
    }

    #[tokio::test]
    async fn test_tv_details_and_credits_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let details_body = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");
        let credits_body = include_str!("../../../../fixtures/tmdb/tv_credits_1399.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(details_body))
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/1399/credits"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(credits_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let details = client.tv_details(1399, "en-US").await.unwrap();
        let credits = client.tv_credits(1399, "en-US").await.unwrap();

        // Assert
        assert_eq!(details.name, "Game of Thrones");
        assert_eq!(credits.cast[0].name, "Emilia Clarke");
    }

    #[tokio::test]
    async fn test_person_images_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/person_images_6384.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/person/6384/images"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let images = client.person_images(6384).await.unwrap();

        // Assert
        assert_eq!(images.profiles.len(), 2);
    }

    #[tokio::test]
    async fn test_search_movie_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_matrix.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "matrix"))
            .and(wiremock::matchers::query_param("include_adult", "false"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let params = SearchMovieParams::new("matrix");

        // Act
        let response = client.search_movie(&params).await.unwrap();

        // Assert
        assert!(!response.results.is_empty());
        assert_eq!(response.results[0].id, 603);
    }

    #[tokio::test]
    async fn test_search_tv_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/tv"))
            .and(wiremock::matchers::query_param("query", "zzzz"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let response = client
            .search_tv(&SearchTvParams::new("zzzz"))
            .await
            .unwrap();

        // Assert
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_api_key_is_sent_as_query_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act & Assert (mock expect(1) verifies the api_key parameter)
        client
            .search_tv(&SearchTvParams::new("test"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::header(
                "Authorization",
                "Bearer my-secret-token",
            ))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("my-secret-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies Authorization header)
        client
            .search_tv(&SearchTvParams::new("test"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.movie_details(603, "en-US").await;

        // Assert
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.person_images(1).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("HTTP 503"));
        assert!(err.contains("upstream down"));
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        // Return 429 for all requests: initial attempt plus MAX_RETRIES
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string(error_body))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.search_tv(&SearchTvParams::new("test")).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.tv_details(1, "en-US").await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        let params = SearchTvParams::new("test");

        // Act
        let start = Instant::now();
        client.search_tv(&params).await.unwrap();
        client.search_tv(&params).await.unwrap();
        let elapsed = start.elapsed();

        // Assert: at least 100ms interval between two requests
        assert!(elapsed >= Duration::from_millis(100));
    }
}
