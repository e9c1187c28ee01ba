//! Result types produced by the recommendation sources.

use data_loader::MovieId;
use thiserror::Error;

/// Which source produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Nearest neighbors of a movie in the reduced feature space
    Similar,
    /// Precomputed per-user prediction table
    Predicted,
}

/// A neighbor of the query movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarMovie {
    pub movie_id: MovieId,
    /// Distance to the query movie under the index metric (lower is closer)
    pub distance: f32,
}

/// A movie with its predicted relevance for one user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f32,
}

/// Errors raised by the sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// The movie exists but has no row in the feature matrix
    #[error("Movie ID {0} is not found in the dataset")]
    MovieNotIndexed(MovieId),

    /// The index rejected the query
    #[error("Similarity query failed: {0}")]
    Index(#[from] data_loader::DataLoadError),
}
