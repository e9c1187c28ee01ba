//! Errors a recommendation request can end in.
//!
//! None of these are fatal: the service turns every one of them into an empty
//! result plus a message for the user.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// Title, movie or user absent from the search results or the artifacts
    #[error("{0}")]
    NotFound(String),

    /// The title search collaborator failed
    #[error("{0}")]
    ExternalService(String),

    /// Out-of-range count, user id 0 or blank title
    #[error("{0}")]
    InvalidInput(String),

    /// The similarity index rejected a query built from the catalog
    #[error("An error occurred: {0}")]
    Index(String),
}

impl RecommendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecommendError::NotFound(_))
    }
}

impl From<sources::SourceError> for RecommendError {
    fn from(err: sources::SourceError) -> Self {
        match err {
            sources::SourceError::MovieNotIndexed(_) => RecommendError::NotFound(err.to_string()),
            sources::SourceError::Index(inner) => RecommendError::Index(inner.to_string()),
        }
    }
}
