//! Precomputed per-user relevance scores.

use crate::types::{MovieId, Prediction, UserId};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Prediction rows grouped by user, each group kept in source order
#[derive(Debug, Clone, Default)]
pub struct PredictionTable {
    by_user: HashMap<UserId, Vec<Prediction>>,
    row_count: usize,
}

impl PredictionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows in source order
    pub fn from_rows(rows: impl IntoIterator<Item = Prediction>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.insert(row);
        }
        table
    }

    /// Append a row to its user's group
    pub fn insert(&mut self, prediction: Prediction) {
        self.by_user
            .entry(prediction.user_id)
            .or_insert_with(Vec::new)
            .push(prediction);
        self.row_count += 1;
    }

    /// All rows of a user in source order, empty when the user is unknown
    pub fn user_predictions(&self, user_id: UserId) -> &[Prediction] {
        self.by_user
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The user's `top_k` rows by descending score.
    ///
    /// The sort is stable, so equal scores keep their source order.
    pub fn top_for_user(&self, user_id: UserId, top_k: usize) -> Vec<(MovieId, f32)> {
        let mut rows: Vec<&Prediction> = self.user_predictions(user_id).iter().collect();
        rows.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        rows.into_iter()
            .take(top_k)
            .map(|p| (p.movie_id, p.score))
            .collect()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.by_user.contains_key(&user_id)
    }

    /// (distinct users, total rows)
    pub fn counts(&self) -> (usize, usize) {
        (self.by_user.len(), self.row_count)
    }

    /// Users with at least one row, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.by_user.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
