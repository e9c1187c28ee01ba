//! Loading the startup artifacts into one immutable bundle.
//!
//! The three files are parsed in parallel, each turned into its in-memory
//! structure, and then checked against each other. Any failure here is
//! fatal: the service refuses to start on a partial bundle.

use crate::catalog::MovieCatalog;
use crate::error::{DataLoadError, Result};
use crate::knn::SimilarityIndex;
use crate::parser;
use crate::predictions::PredictionTable;
use std::path::Path;
use tracing::info;

/// File name of the fitted similarity index
pub const MODEL_FILE: &str = "model.json";
/// File name of the catalog bundle
pub const CATALOG_FILE: &str = "data.json";
/// File name of the prediction table
pub const PREDICTIONS_FILE: &str = "predictions.csv";

/// Everything the recommendation service reads, loaded once at startup
#[derive(Debug, Clone)]
pub struct Artifacts {
    catalog: MovieCatalog,
    similarity: SimilarityIndex,
    predictions: PredictionTable,
}

impl Artifacts {
    /// Bundle already-built structures, checking they describe the same matrix
    pub fn new(
        catalog: MovieCatalog,
        similarity: SimilarityIndex,
        predictions: PredictionTable,
    ) -> Result<Self> {
        let artifacts = Self {
            catalog,
            similarity,
            predictions,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }

    /// Load all three artifacts from a directory
    ///
    /// Steps:
    /// 1. Parse model.json, data.json and predictions.csv in parallel
    /// 2. Build the similarity index, catalog and prediction table
    /// 3. Validate the index against the catalog's feature matrix
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        info!("Loading recommendation artifacts from {:?}", dir);

        let model_path = dir.join(MODEL_FILE);
        let catalog_path = dir.join(CATALOG_FILE);
        let predictions_path = dir.join(PREDICTIONS_FILE);

        // Nested joins give three-way parallelism
        let ((model, catalog), predictions) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_model(&model_path).and_then(SimilarityIndex::from_artifact),
                    || parser::parse_catalog(&catalog_path).and_then(MovieCatalog::from_artifact),
                )
            },
            || parser::parse_predictions(&predictions_path).map(PredictionTable::from_rows),
        );

        let similarity = model?;
        let catalog = catalog?;
        let predictions = predictions?;

        let (indexed, titled) = catalog.counts();
        let (users, rows) = predictions.counts();
        info!(
            "Loaded {} indexed movies ({} titles), {}-d features, {} predictions for {} users",
            indexed,
            titled,
            catalog.feature_matrix().dim(),
            rows,
            users
        );

        let artifacts = Self::new(catalog, similarity, predictions)?;
        info!("Artifacts successfully loaded and validated");
        Ok(artifacts)
    }

    /// Check that the fitted index covers exactly the catalog's feature rows
    pub fn validate(&self) -> Result<()> {
        let features = self.catalog.feature_matrix();
        if self.similarity.len() != features.len() {
            return Err(DataLoadError::ValidationError(format!(
                "similarity index has {} rows but feature matrix has {}",
                self.similarity.len(),
                features.len()
            )));
        }
        if !features.is_empty() && self.similarity.dim() != features.dim() {
            return Err(DataLoadError::ValidationError(format!(
                "similarity index has {} dimensions but feature matrix has {}",
                self.similarity.dim(),
                features.dim()
            )));
        }
        Ok(())
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    pub fn predictions(&self) -> &PredictionTable {
        &self.predictions
    }
}
