//! Brute-force k-nearest-neighbor index over the reduced feature matrix.
//!
//! The index is fitted offline; at startup we only rebuild it from the rows
//! and parameters stored in `model.json`. Queries scan every row, which is
//! what the fitted model does too for a few thousand low-dimensional vectors.

use crate::error::{DataLoadError, Result};
use crate::types::{FeatureMatrix, Metric, ModelArtifact, Neighbor};
use rayon::prelude::*;
use std::cmp::Ordering;

/// A fitted, immutable nearest-neighbor index
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    metric: Metric,
    n_neighbors: usize,
    rows: FeatureMatrix,
    /// Precomputed L2 norms, only used by the cosine metric
    norms: Vec<f32>,
}

impl SimilarityIndex {
    /// Fit an index over `rows`
    pub fn fit(metric: Metric, n_neighbors: usize, rows: FeatureMatrix) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(DataLoadError::InvalidValue {
                field: "n_neighbors".to_string(),
                value: "0".to_string(),
            });
        }
        let norms = rows.rows().map(l2_norm).collect();
        Ok(Self {
            metric,
            n_neighbors,
            rows,
            norms,
        })
    }

    /// Rebuild an index from its serialized form
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let rows = FeatureMatrix::from_rows(artifact.fit_rows)?;
        Self::fit(artifact.metric, artifact.n_neighbors, rows)
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Neighbor count the index was fitted with
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Number of fitted rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dimension of the fitted rows
    pub fn dim(&self) -> usize {
        self.rows.dim()
    }

    /// Return the `k` rows closest to `query`, nearest first.
    ///
    /// Ties are broken by ascending row index so repeated queries always
    /// return the same order. Asking for more rows than exist returns all of
    /// them.
    pub fn kneighbors(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.rows.dim() {
            return Err(DataLoadError::ValidationError(format!(
                "query has {} dimensions, index expects {}",
                query.len(),
                self.rows.dim()
            )));
        }

        let query_norm = l2_norm(query);
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .rows()
            .collect::<Vec<_>>()
            .par_iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: self.distance(query, query_norm, row, self.norms[index]),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Query with the neighbor count the index was fitted with
    pub fn kneighbors_default(&self, query: &[f32]) -> Result<Vec<Neighbor>> {
        self.kneighbors(query, self.n_neighbors)
    }

    fn distance(&self, a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
        match self.metric {
            Metric::Cosine => {
                if a_norm == 0.0 || b_norm == 0.0 {
                    return 1.0;
                }
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                1.0 - dot / (a_norm * b_norm)
            }
            Metric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            Metric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_index(metric: Metric) -> SimilarityIndex {
        // Points on a line at x = 0, 1, 2, 3, 4
        let rows = (0..5).map(|x| vec![x as f32, 0.0]).collect();
        SimilarityIndex::fit(metric, 3, FeatureMatrix::from_rows(rows).unwrap()).unwrap()
    }

    #[test]
    fn test_euclidean_nearest_first() {
        let index = line_index(Metric::Euclidean);
        let neighbors = index.kneighbors(&[0.0, 0.0], 3).unwrap();

        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(neighbors[0].distance, 0.0);
        assert!((neighbors[2].distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_manhattan_distance() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![3.0, 0.0]];
        let index = SimilarityIndex::fit(Metric::Manhattan, 2, FeatureMatrix::from_rows(rows).unwrap()).unwrap();
        let neighbors = index.kneighbors(&[0.0, 0.0], 3).unwrap();

        assert_eq!(neighbors[1].index, 1);
        assert!((neighbors[1].distance - 2.0).abs() < 1e-6);
        assert!((neighbors[2].distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let rows = vec![vec![1.0, 0.0], vec![10.0, 0.5], vec![0.0, 1.0], vec![0.0, 0.0]];
        let index = SimilarityIndex::fit(Metric::Cosine, 2, FeatureMatrix::from_rows(rows).unwrap()).unwrap();
        let neighbors = index.kneighbors(&[2.0, 0.0], 4).unwrap();

        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(neighbors[0].distance.abs() < 1e-6);
        // Orthogonal and zero vectors both sit at distance 1, index breaks the tie
        assert!((neighbors[2].distance - 1.0).abs() < 1e-6);
        assert!((neighbors[3].distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_break_by_index() {
        let index = line_index(Metric::Euclidean);
        // x = 2 is equidistant from 1 and 3
        let neighbors = index.kneighbors(&[2.0, 0.0], 3).unwrap();
        let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![2, 1, 3]);
    }

    #[test]
    fn test_k_larger_than_rows() {
        let index = line_index(Metric::Euclidean);
        assert_eq!(index.kneighbors(&[0.0, 0.0], 50).unwrap().len(), 5);
    }

    #[test]
    fn test_default_neighbor_count() {
        let index = line_index(Metric::Euclidean);
        assert_eq!(index.kneighbors_default(&[4.0, 0.0]).unwrap().len(), 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = line_index(Metric::Euclidean);
        assert!(index.kneighbors(&[0.0], 3).is_err());
    }

    #[test]
    fn test_zero_neighbors_rejected() {
        let rows = FeatureMatrix::from_rows(vec![vec![1.0]]).unwrap();
        assert!(SimilarityIndex::fit(Metric::Cosine, 0, rows).is_err());
    }
}
