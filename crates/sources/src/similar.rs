//! Similar Source - nearest neighbors in the reduced feature space
//!
//! ## Algorithm
//! 1. Look up the query movie's row in the catalog
//! 2. Ask the similarity index for the `k + 1` nearest rows
//! 3. Drop the query's own row (it is normally its own nearest neighbor)
//! 4. Truncate to `k` and map rows back to movie ids, nearest first

use crate::types::{SimilarMovie, SourceError};
use data_loader::{Artifacts, MovieId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Finds movies close to a given movie
#[derive(Clone)]
pub struct SimilarMoviesSource {
    artifacts: Arc<Artifacts>,
}

impl SimilarMoviesSource {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// Up to `k` movies nearest to `movie_id`, excluding the movie itself
    #[instrument(skip(self))]
    pub fn similar_to(&self, movie_id: MovieId, k: usize) -> Result<Vec<SimilarMovie>, SourceError> {
        let catalog = self.artifacts.catalog();

        let query_index = catalog
            .lookup_index(movie_id)
            .ok_or(SourceError::MovieNotIndexed(movie_id))?;
        let query = catalog
            .features(query_index)
            .ok_or(SourceError::MovieNotIndexed(movie_id))?;

        let neighbors = self
            .artifacts
            .similarity()
            .kneighbors(query, k.saturating_add(1))?;

        let similar: Vec<SimilarMovie> = neighbors
            .into_iter()
            .filter(|n| n.index != query_index)
            .take(k)
            .filter_map(|n| {
                Some(SimilarMovie {
                    movie_id: catalog.movie_at(n.index)?,
                    distance: n.distance,
                })
            })
            .collect();

        debug!(
            "Found {} movies similar to {} ({})",
            similar.len(),
            movie_id,
            catalog.title_of(movie_id)
        );
        Ok(similar)
    }
}
