//! Core domain types for the recommendation artifacts.
//!
//! Everything in here is built once at startup and never mutated afterwards,
//! so the query paths only ever hand out shared references.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// External movie-database identifier (e.g. 862 for "Toy Story")
pub type MovieId = u32;

/// Identifier of a user in the prediction table
pub type UserId = u32;

// =============================================================================
// Catalog Types
// =============================================================================

/// A movie known to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Row of this movie in the reduced feature matrix
    pub index: usize,
}

/// Dense row-major matrix of reduced movie features.
///
/// Rows are stored back to back in one allocation; every row has `dim` values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    dim: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Build a matrix from nested rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.first().map(|r| r.len()).unwrap_or(0);
        if !rows.is_empty() && dim == 0 {
            return Err(DataLoadError::ValidationError(
                "feature rows must not be empty".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(DataLoadError::ValidationError(format!(
                    "feature row {} has {} values, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(DataLoadError::InvalidValue {
                    field: format!("feature row {}", i),
                    value: bad.to_string(),
                });
            }
            data.extend(row);
        }

        Ok(Self { dim, data })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of every row
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Borrow one row, `None` when out of range
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim).filter(|_| self.dim > 0)
    }

    /// Iterate rows in index order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim.max(1))
    }
}

// =============================================================================
// Similarity Types
// =============================================================================

/// Distance metric the similarity index was fitted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// 1 - cosine similarity; a zero vector has similarity 0 to everything
    Cosine,
    Euclidean,
    Manhattan,
}

/// One result of a nearest-neighbor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row in the fitted matrix
    pub index: usize,
    pub distance: f32,
}

// =============================================================================
// Prediction Types
// =============================================================================

/// Precomputed relevance of one movie for one user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f32,
}

// =============================================================================
// Serialized Artifact Layouts
// =============================================================================

/// On-disk layout of `model.json`, the fitted similarity index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metric: Metric,
    /// Neighbor count the index was fitted with, used when a query gives none
    pub n_neighbors: usize,
    pub fit_rows: Vec<Vec<f32>>,
}

/// On-disk layout of `data.json`, the catalog bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogArtifact {
    pub features: Vec<Vec<f32>>,
    /// Movie id -> feature row
    pub movie_mapper: HashMap<MovieId, usize>,
    /// Feature row -> movie id
    pub movie_inv_mapper: HashMap<usize, MovieId>,
    pub movie_titles: HashMap<MovieId, String>,
}
