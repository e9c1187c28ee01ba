//! # Data Loader Crate
//!
//! Loads the precomputed recommendation artifacts and exposes them as
//! read-only in-memory structures.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieId, Movie, FeatureMatrix, Prediction)
//! - **parser**: Parse model.json, data.json and predictions.csv
//! - **catalog**: Movie id <-> feature row mapping and display titles
//! - **knn**: Brute-force nearest-neighbor index over the feature matrix
//! - **predictions**: Per-user relevance scores with top-k lookup
//! - **index**: Load and cross-validate all three artifacts
//! - **error**: Error types for artifact loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Artifacts;
//! use std::path::Path;
//!
//! let artifacts = Artifacts::load_from_dir(Path::new("artifacts"))?;
//!
//! let index = artifacts.catalog().lookup_index(862).unwrap();
//! let row = artifacts.catalog().features(index).unwrap();
//! let neighbors = artifacts.similarity().kneighbors(row, 11)?;
//! let top = artifacts.predictions().top_for_user(1, 10);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod catalog;
pub mod knn;
pub mod predictions;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Movie,
    FeatureMatrix,
    Metric,
    Neighbor,
    Prediction,
    // Serialized layouts
    CatalogArtifact,
    ModelArtifact,
};
pub use catalog::{MovieCatalog, UNKNOWN_TITLE};
pub use knn::SimilarityIndex;
pub use predictions::PredictionTable;
pub use index::{Artifacts, CATALOG_FILE, MODEL_FILE, PREDICTIONS_FILE};
