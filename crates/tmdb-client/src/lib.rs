//! HTTP client for The Movie Database (TMDb).
//!
//! This crate provides the two external collaborators the recommendation
//! service talks to:
//! - [`TitleSearch`]: free-text title search, used to resolve a title to a movie id
//! - [`MetadataFetcher`]: poster and title lookup for a single movie id
//!
//! [`TmdbClient`] implements both over one `reqwest` client. Metadata lookups
//! never fail; failures degrade to [`PosterImage::Fallback`] or
//! [`PosterImage::Error`].

pub mod types;

use async_trait::async_trait;
use data_loader::MovieId;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

pub use types::{
    ERROR_IMAGE_PLACEHOLDER, MovieMetadata, NO_IMAGE_PLACEHOLDER, PosterImage, SearchHit,
};
use types::{MovieDetails, SearchResponse};

/// Base URL of the TMDb v3 API
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

/// Base URL poster paths are appended to
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Errors that can occur when talking to TMDb
#[derive(Error, Debug)]
pub enum TmdbClientError {
    #[error("HTTP request to TMDb failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TMDb returned status {0}")]
    Status(u16),

    #[error("Invalid response from TMDb: {0}")]
    InvalidResponse(String),
}

/// Searches movies by free-text title
#[async_trait]
pub trait TitleSearch: Send + Sync {
    /// Candidates in the collaborator's ranking order; empty means no match
    async fn search_titles(&self, query: &str) -> Result<Vec<SearchHit>, TmdbClientError>;
}

/// Looks up poster and title for one movie
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Never fails: problems are reported through [`PosterImage`]
    async fn fetch_metadata(&self, movie_id: MovieId) -> MovieMetadata;
}

/// Connection settings for [`TmdbClient`]
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    api_key: String,
    api_url: String,
    image_base_url: String,
    timeout: Duration,
}

impl TmdbConfig {
    /// Settings for the public TMDb API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Configure the API base URL (default: [`DEFAULT_API_URL`])
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Configure the poster base URL (default: [`DEFAULT_IMAGE_BASE_URL`])
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Configure the per-request timeout (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Join the image base URL and a poster path such as `/abc.jpg`
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }
}

/// TMDb client implementing both collaborators
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
}

impl TmdbClient {
    /// Build a client; fails only if the HTTP client cannot be constructed
    pub fn new(config: TmdbConfig) -> Result<Self, TmdbClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Fetch `/movie/{id}`; a non-success status yields `Ok(None)`
    async fn get_details(&self, movie_id: MovieId) -> Result<Option<MovieDetails>, TmdbClientError> {
        let response = self
            .http
            .get(self.config.endpoint(&format!("movie/{}", movie_id)))
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(
                movie_id,
                status = response.status().as_u16(),
                "TMDb has no details for movie"
            );
            return Ok(None);
        }

        let details = response
            .json::<MovieDetails>()
            .await
            .map_err(|e| TmdbClientError::InvalidResponse(e.to_string()))?;
        Ok(Some(details))
    }
}

#[async_trait]
impl TitleSearch for TmdbClient {
    async fn search_titles(&self, query: &str) -> Result<Vec<SearchHit>, TmdbClientError> {
        debug!(query, "Searching TMDb titles");

        let response = self
            .http
            .get(self.config.endpoint("search/movie"))
            .query(&[("api_key", self.config.api_key.as_str()), ("query", query)])
            .send()
            .await
            .map_err(|e| {
                error!("TMDb search request failed: {}", e);
                TmdbClientError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(query, status = status.as_u16(), "TMDb search rejected");
            return Err(TmdbClientError::Status(status.as_u16()));
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| TmdbClientError::InvalidResponse(e.to_string()))?;

        let hits = body.into_hits();
        debug!(query, results = hits.len(), "TMDb search complete");
        Ok(hits)
    }
}

#[async_trait]
impl MetadataFetcher for TmdbClient {
    async fn fetch_metadata(&self, movie_id: MovieId) -> MovieMetadata {
        match self.get_details(movie_id).await {
            Ok(Some(details)) => {
                let poster = details
                    .poster_path
                    .filter(|path| !path.trim().is_empty())
                    .map(|path| PosterImage::Found(self.config.poster_url(&path)))
                    .unwrap_or(PosterImage::Fallback);
                MovieMetadata {
                    poster,
                    title: details.title,
                }
            }
            Ok(None) => MovieMetadata::fallback(),
            Err(e) => {
                warn!(movie_id, "Error fetching metadata: {}", e);
                MovieMetadata::error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const API_KEY: &str = "test-key";

    // ============================================================================
    // Mock TMDb Service
    // ============================================================================

    fn authorized(params: &HashMap<String, String>) -> bool {
        params.get("api_key").map(String::as_str) == Some(API_KEY)
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
        if !authorized(&params) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        let results = match params.get("query").map(String::as_str) {
            Some("toy story") => json!([
                {"id": 10193, "title": "Toy Story 3"},
                {"id": 862, "title": "Toy Story"}
            ]),
            Some("broken") => return (StatusCode::OK, "not json").into_response(),
            _ => json!([]),
        };
        Json(json!({"page": 1, "results": results})).into_response()
    }

    async fn details(
        Path(movie_id): Path<u32>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        if !authorized(&params) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        match movie_id {
            862 => Json(json!({"id": 862, "title": "Toy Story", "poster_path": "/uXDfjJbdP4ijW5hWSBrPrlKpxab.jpg"})).into_response(),
            8844 => Json(json!({"id": 8844, "title": "Jumanji", "poster_path": null})).into_response(),
            666 => (StatusCode::OK, "garbage").into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Start a mock TMDb API on a random port
    async fn start_mock_tmdb() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/search/movie", get(search))
            .route("/movie/:id", get(details));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock TMDb service");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock TMDb service failed");
        });

        (format!("http://{}", addr), handle)
    }

    fn client_for(addr: &str, api_key: &str) -> TmdbClient {
        TmdbClient::new(TmdbConfig::new(api_key).with_api_url(addr)).expect("Failed to build client")
    }

    #[test]
    fn test_poster_url_joins_slashes() {
        let config = TmdbConfig::new("k");
        assert_eq!(
            config.poster_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );

        let config = TmdbConfig::new("k").with_image_base_url("http://img/w185/");
        assert_eq!(config.poster_url("abc.jpg"), "http://img/w185/abc.jpg");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = TmdbConfig::new("k").with_api_url("http://localhost:1234/3/");
        assert_eq!(config.endpoint("search/movie"), "http://localhost:1234/3/search/movie");
    }

    #[tokio::test]
    async fn test_search_titles_keeps_ranking_order() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        let hits = client.search_titles("toy story").await.unwrap();
        let ids: Vec<MovieId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![10193, 862]);

        handle.abort();
    }

    #[tokio::test]
    async fn test_search_titles_no_results() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        assert!(client.search_titles("nothing here").await.unwrap().is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_search_titles_status_error() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, "wrong-key");

        let err = client.search_titles("toy story").await.unwrap_err();
        assert!(matches!(err, TmdbClientError::Status(401)));

        handle.abort();
    }

    #[tokio::test]
    async fn test_search_titles_malformed_body() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        let err = client.search_titles("broken").await.unwrap_err();
        assert!(matches!(err, TmdbClientError::InvalidResponse(_)));

        handle.abort();
    }

    #[tokio::test]
    async fn test_fetch_metadata_found() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        let metadata = client.fetch_metadata(862).await;
        assert_eq!(
            metadata.poster,
            PosterImage::Found(
                "https://image.tmdb.org/t/p/w500/uXDfjJbdP4ijW5hWSBrPrlKpxab.jpg".to_string()
            )
        );
        assert_eq!(metadata.title.as_deref(), Some("Toy Story"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_fetch_metadata_without_poster() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        let metadata = client.fetch_metadata(8844).await;
        assert_eq!(metadata.poster, PosterImage::Fallback);
        assert_eq!(metadata.title.as_deref(), Some("Jumanji"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_fetch_metadata_not_found() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        assert_eq!(client.fetch_metadata(1).await, MovieMetadata::fallback());

        handle.abort();
    }

    #[tokio::test]
    async fn test_fetch_metadata_undecodable_body() {
        let (addr, handle) = start_mock_tmdb().await;
        let client = client_for(&addr, API_KEY);

        assert_eq!(client.fetch_metadata(666).await, MovieMetadata::error());

        handle.abort();
    }

    #[tokio::test]
    async fn test_fetch_metadata_connection_refused() {
        // Grab a free port, then close it so nothing is listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = client_for(&addr, API_KEY);
        assert_eq!(client.fetch_metadata(862).await, MovieMetadata::error());
        assert!(matches!(
            client.search_titles("toy story").await,
            Err(TmdbClientError::Http(_))
        ));
    }
}
