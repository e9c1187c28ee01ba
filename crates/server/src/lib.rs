//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate contains the service that answers recommendation requests
//! against the loaded artifacts and turns the results into poster tiles.

pub mod error;
pub mod posters;
pub mod service;

pub use error::RecommendError;
pub use posters::{DEFAULT_GRID_COLUMNS, PosterGrid, PosterTile};
pub use service::{MAX_COUNT, Recommendations, RecommendationService, normalize_title};
