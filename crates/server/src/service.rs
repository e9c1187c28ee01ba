//! # Recommendation Service
//!
//! Entry point for both recommendation modes:
//! - by title: search the title, resolve it to a movie id, return its nearest
//!   neighbors from the similarity index
//! - by user: return the user's top rows from the prediction table
//!
//! Every lookup failure is caught here. The plain `recommend_*` calls never
//! fail; they return an empty [`Recommendations`] carrying the error so the
//! caller can show a message. The `try_*` variants return the typed error.
//!
//! [`RecommendationService::poster_grid`] then turns the returned ids into
//! display tiles, fetching one movie's metadata at a time.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use data_loader::{Artifacts, MovieId, UNKNOWN_TITLE, UserId};
use sources::{
    CandidateSource, PredictedRatingsSource, ScoredMovie, SimilarMoviesSource, resolve_title,
};
use tmdb_client::{MetadataFetcher, TitleSearch, TmdbClient};

use crate::error::RecommendError;
use crate::posters::{DEFAULT_GRID_COLUMNS, PosterGrid, PosterTile};

/// Largest number of movies a single request may ask for
pub const MAX_COUNT: usize = 20;

/// Result of one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations<T> {
    pub source: CandidateSource,
    /// Best first; empty whenever `failure` is set
    pub items: Vec<T>,
    pub failure: Option<RecommendError>,
}

impl<T> Recommendations<T> {
    fn from_result(source: CandidateSource, result: Result<Vec<T>, RecommendError>) -> Self {
        match result {
            Ok(items) => Self {
                source,
                items,
                failure: None,
            },
            Err(err) => Self {
                source,
                items: Vec::new(),
                failure: Some(err),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Human-readable reason the request failed, if it did
    pub fn message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Answers recommendation requests against one loaded set of artifacts
#[derive(Clone)]
pub struct RecommendationService {
    artifacts: Arc<Artifacts>,
    similar: SimilarMoviesSource,
    predicted: PredictedRatingsSource,
    search: Arc<dyn TitleSearch>,
    metadata: Arc<dyn MetadataFetcher>,
    grid_columns: usize,
}

impl RecommendationService {
    pub fn new(
        artifacts: Arc<Artifacts>,
        search: Arc<dyn TitleSearch>,
        metadata: Arc<dyn MetadataFetcher>,
    ) -> Self {
        Self {
            similar: SimilarMoviesSource::new(artifacts.clone()),
            predicted: PredictedRatingsSource::new(artifacts.clone()),
            artifacts,
            search,
            metadata,
            grid_columns: DEFAULT_GRID_COLUMNS,
        }
    }

    /// Uses one TMDb client for both title search and metadata
    pub fn with_tmdb(artifacts: Arc<Artifacts>, client: TmdbClient) -> Self {
        let client = Arc::new(client);
        Self::new(artifacts, client.clone(), client)
    }

    /// Tiles per row in [`poster_grid`](Self::poster_grid)
    pub fn with_grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = columns.max(1);
        self
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    /// Movies similar to the one best matching `title`
    pub async fn recommend_by_title(&self, title: &str, k: usize) -> Recommendations<MovieId> {
        let result = self.try_recommend_by_title(title, k).await;
        if let Err(err) = &result {
            warn!(title, k, "Recommendation by title failed: {}", err);
        }
        Recommendations::from_result(CandidateSource::Similar, result)
    }

    /// Up to `k` movie ids nearest to the resolved title, nearest first.
    ///
    /// The resolved movie itself is never part of the result.
    pub async fn try_recommend_by_title(
        &self,
        title: &str,
        k: usize,
    ) -> Result<Vec<MovieId>, RecommendError> {
        let start_time = Instant::now();

        let title = title.trim();
        if title.is_empty() {
            return Err(RecommendError::InvalidInput(
                "Please enter a valid movie title.".to_string(),
            ));
        }
        check_count(k)?;

        let hits = self.search.search_titles(title).await.map_err(|e| {
            RecommendError::ExternalService(format!("TMDb API error occurred: {}", e))
        })?;
        let hit = resolve_title(title, &hits).ok_or_else(|| {
            RecommendError::NotFound(format!("No search results found for movie: {}", title))
        })?;
        debug!(
            "Resolved \"{}\" to movie {} ({}) out of {} results",
            title,
            hit.id,
            hit.title,
            hits.len()
        );

        let movie_ids: Vec<MovieId> = self
            .similar
            .similar_to(hit.id, k)?
            .into_iter()
            .map(|movie| movie.movie_id)
            .collect();

        info!(
            "Found {} movies similar to \"{}\" in {:.2?}",
            movie_ids.len(),
            title,
            start_time.elapsed()
        );
        Ok(movie_ids)
    }

    /// The user's highest predicted movies
    pub fn recommend_by_user(&self, user_id: UserId, k: usize) -> Recommendations<ScoredMovie> {
        let result = self.try_recommend_by_user(user_id, k);
        if let Err(err) = &result {
            warn!(user_id, k, "Recommendation by user failed: {}", err);
        }
        Recommendations::from_result(CandidateSource::Predicted, result)
    }

    /// Up to `k` movies by non-increasing predicted score.
    ///
    /// A user without predictions gets an empty list, not an error.
    pub fn try_recommend_by_user(
        &self,
        user_id: UserId,
        k: usize,
    ) -> Result<Vec<ScoredMovie>, RecommendError> {
        if user_id == 0 {
            return Err(RecommendError::InvalidInput(
                "User ID must be a positive integer".to_string(),
            ));
        }
        check_count(k)?;

        let movies = self.predicted.top_for_user(user_id, k);
        if movies.is_empty() {
            debug!("No predictions for user {}", user_id);
        } else {
            info!("Selected {} predicted movies for user {}", movies.len(), user_id);
        }
        Ok(movies)
    }

    /// Display tiles for `movie_ids`, in the given order.
    ///
    /// Metadata is fetched one movie at a time. The title shown is the
    /// catalog title, else the fetched title, else `"Unknown"`.
    pub async fn poster_grid(&self, movie_ids: &[MovieId]) -> PosterGrid {
        let catalog = self.artifacts.catalog();
        let mut tiles = Vec::with_capacity(movie_ids.len());

        for &movie_id in movie_ids {
            let metadata = self.metadata.fetch_metadata(movie_id).await;
            if !metadata.poster.is_found() {
                debug!("Using placeholder poster for movie {}", movie_id);
            }

            let title = catalog
                .get_title(movie_id)
                .map(str::to_string)
                .or(metadata.title)
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

            tiles.push(PosterTile {
                movie_id,
                title,
                poster: metadata.poster,
            });
        }

        PosterGrid::new(tiles, self.grid_columns)
    }

    /// Every catalog title, ordered for display
    pub fn titles(&self) -> Vec<(MovieId, &str)> {
        self.artifacts.catalog().all_titles()
    }
}

/// Strips a `" (1995)"` style suffix from a catalog title.
///
/// Everything from the first `" ("` on is dropped, then the rest is trimmed.
pub fn normalize_title(title: &str) -> &str {
    let base = match title.find(" (") {
        Some(pos) => &title[..pos],
        None => title,
    };
    base.trim()
}

fn check_count(k: usize) -> Result<(), RecommendError> {
    if k == 0 || k > MAX_COUNT {
        return Err(RecommendError::InvalidInput(format!(
            "Number of movies must be between 1 and {}, got {}",
            MAX_COUNT, k
        )));
    }
    Ok(())
}
