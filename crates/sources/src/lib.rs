//! # Sources Crate
//!
//! The two recommendation sources built on the loaded artifacts.
//!
//! ## Components
//!
//! ### Similar Source (by title)
//! Nearest neighbors of a movie in the reduced feature space:
//! - "Movies like the one you picked"
//! - Resolves a free-text title with [`resolve_title`] first
//!
//! ### Predicted Source (by user)
//! Top rows of the precomputed prediction table for one user.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{PredictedRatingsSource, SimilarMoviesSource, resolve_title};
//! use data_loader::Artifacts;
//! use std::sync::Arc;
//!
//! let artifacts = Arc::new(Artifacts::load_from_dir(Path::new("artifacts"))?);
//!
//! let similar = SimilarMoviesSource::new(artifacts.clone());
//! let predicted = PredictedRatingsSource::new(artifacts.clone());
//!
//! let hit = resolve_title("Toy Story", &search_hits).unwrap();
//! let neighbors = similar.similar_to(hit.id, 10)?;
//! let top = predicted.top_for_user(1, 10);
//! ```
//!
//! Both sources only read the shared artifacts, so they are cheap to clone
//! and safe to use from any thread.

// Public modules
pub mod types;
pub mod resolve;
pub mod similar;
pub mod predicted;

// Re-export commonly used types
pub use types::{CandidateSource, ScoredMovie, SimilarMovie, SourceError};
pub use resolve::resolve_title;
pub use similar::SimilarMoviesSource;
pub use predicted::PredictedRatingsSource;
