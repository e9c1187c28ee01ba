//! Read-only catalog of movies: id <-> feature row mapping and display titles.

use crate::error::{DataLoadError, Result};
use crate::types::{CatalogArtifact, FeatureMatrix, Movie, MovieId};
use std::collections::HashMap;

/// Title shown for movies the catalog has no entry for
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Movie catalog loaded from the `data.json` bundle.
///
/// Lookups never fail: absent ids yield `None` or [`UNKNOWN_TITLE`].
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    features: FeatureMatrix,
    id_to_index: HashMap<MovieId, usize>,
    /// Position `i` holds the movie at feature row `i`
    index_to_id: Vec<MovieId>,
    titles: HashMap<MovieId, String>,
}

impl MovieCatalog {
    /// Build and validate a catalog from its serialized bundle.
    ///
    /// The id mapping and its inverse must describe the same bijection over
    /// `0..features.len()`, and every indexed movie must have a title.
    pub fn from_artifact(artifact: CatalogArtifact) -> Result<Self> {
        let features = FeatureMatrix::from_rows(artifact.features)?;
        let rows = features.len();

        if artifact.movie_mapper.len() != rows {
            return Err(DataLoadError::ValidationError(format!(
                "movie_mapper has {} entries but feature matrix has {} rows",
                artifact.movie_mapper.len(),
                rows
            )));
        }
        if artifact.movie_inv_mapper.len() != rows {
            return Err(DataLoadError::ValidationError(format!(
                "movie_inv_mapper has {} entries but feature matrix has {} rows",
                artifact.movie_inv_mapper.len(),
                rows
            )));
        }

        let mut index_to_id: Vec<Option<MovieId>> = vec![None; rows];
        for (&index, &movie_id) in &artifact.movie_inv_mapper {
            let slot = index_to_id.get_mut(index).ok_or_else(|| DataLoadError::InvalidValue {
                field: "movie_inv_mapper index".to_string(),
                value: index.to_string(),
            })?;
            *slot = Some(movie_id);
        }

        for (&movie_id, &index) in &artifact.movie_mapper {
            match index_to_id.get(index).copied().flatten() {
                Some(id) if id == movie_id => {}
                Some(id) => {
                    return Err(DataLoadError::ValidationError(format!(
                        "movie {} maps to row {} but row {} maps back to movie {}",
                        movie_id, index, index, id
                    )));
                }
                None => {
                    return Err(DataLoadError::InvalidValue {
                        field: "movie_mapper index".to_string(),
                        value: index.to_string(),
                    });
                }
            }
            if !artifact.movie_titles.contains_key(&movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Title".to_string(),
                    id: movie_id as u64,
                });
            }
        }

        // Both maps have `rows` entries and every forward entry round-trips,
        // so every slot is filled
        let index_to_id = index_to_id.into_iter().flatten().collect();

        Ok(Self {
            features,
            id_to_index: artifact.movie_mapper,
            index_to_id,
            titles: artifact.movie_titles,
        })
    }

    /// Feature row of a movie, if it is indexed
    pub fn lookup_index(&self, movie_id: MovieId) -> Option<usize> {
        self.id_to_index.get(&movie_id).copied()
    }

    /// Movie id stored at a feature row
    pub fn movie_at(&self, index: usize) -> Option<MovieId> {
        self.index_to_id.get(index).copied()
    }

    /// Display title, or [`UNKNOWN_TITLE`]
    pub fn title_of(&self, movie_id: MovieId) -> &str {
        self.titles
            .get(&movie_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TITLE)
    }

    /// Display title when the catalog has one
    pub fn get_title(&self, movie_id: MovieId) -> Option<&str> {
        self.titles.get(&movie_id).map(String::as_str)
    }

    /// Full record of an indexed movie
    pub fn get_movie(&self, movie_id: MovieId) -> Option<Movie> {
        let index = self.lookup_index(movie_id)?;
        Some(Movie {
            id: movie_id,
            title: self.title_of(movie_id).to_string(),
            index,
        })
    }

    /// Feature row by index
    pub fn features(&self, index: usize) -> Option<&[f32]> {
        self.features.row(index)
    }

    pub fn feature_matrix(&self) -> &FeatureMatrix {
        &self.features
    }

    /// Every titled movie, ordered by title (case-insensitive) then id
    pub fn all_titles(&self) -> Vec<(MovieId, &str)> {
        let mut titles: Vec<(MovieId, &str)> = self
            .titles
            .iter()
            .map(|(&id, title)| (id, title.as_str()))
            .collect();
        titles.sort_by(|a, b| {
            a.1.to_lowercase()
                .cmp(&b.1.to_lowercase())
                .then_with(|| a.0.cmp(&b.0))
        });
        titles
    }

    /// (indexed movies, titled movies)
    pub fn counts(&self) -> (usize, usize) {
        (self.index_to_id.len(), self.titles.len())
    }
}
