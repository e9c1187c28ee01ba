//! Predicted Source - top movies from the precomputed prediction table

use crate::types::ScoredMovie;
use data_loader::{Artifacts, UserId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranks a user's precomputed predictions
#[derive(Clone)]
pub struct PredictedRatingsSource {
    artifacts: Arc<Artifacts>,
}

impl PredictedRatingsSource {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// The user's `top_k` movies by descending predicted score.
    ///
    /// A user with no rows gets an empty list.
    #[instrument(skip(self))]
    pub fn top_for_user(&self, user_id: UserId, top_k: usize) -> Vec<ScoredMovie> {
        let top: Vec<ScoredMovie> = self
            .artifacts
            .predictions()
            .top_for_user(user_id, top_k)
            .into_iter()
            .map(|(movie_id, score)| ScoredMovie { movie_id, score })
            .collect();

        debug!("Selected {} predicted movies for user {}", top.len(), user_id);
        top
    }

    /// Whether the prediction table has any row for this user
    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.artifacts.predictions().contains_user(user_id)
    }
}
