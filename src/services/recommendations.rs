use std::cmp::Ordering;

use thiserror::Error;

use crate::model::{IdentifierIndex, Model, SimilarityMatrix};

/// Query-time errors; both are recoverable and surfaced to the caller
#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error("Movie not found: {0}")]
    UnknownItem(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A ranked candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub score: f32,
}

/// Ranks every other item by similarity to `query` and returns at most `k`.
///
/// Order is descending score, ties broken by ascending row (catalog order).
/// The query row itself is never returned. Pure: safe to call concurrently
/// against a shared model.
pub fn recommend(
    query: &str,
    k: usize,
    index: &IdentifierIndex,
    matrix: &SimilarityMatrix,
) -> Result<Vec<Recommendation>, RecommendError> {
    if k == 0 {
        return Err(RecommendError::InvalidArgument(
            "k must be a positive integer".to_string(),
        ));
    }

    let query_row = index
        .row_of(query)
        .ok_or_else(|| RecommendError::UnknownItem(query.to_string()))?;

    let mut candidates: Vec<(usize, f32)> = matrix
        .row(query_row)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(row, _)| row != query_row)
        .collect();

    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, rank_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(rank_order);

    Ok(candidates
        .into_iter()
        .filter_map(|(row, score)| {
            index.identifier(row).map(|title| Recommendation {
                title: title.to_string(),
                score,
            })
        })
        .collect())
}

/// Total order: higher score first, then lower row
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Recommendation engine with a configurable default and upper bound for k
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine {
    default_k: usize,
    max_k: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(5, 100)
    }
}

impl RecommendationEngine {
    pub fn new(default_k: usize, max_k: usize) -> Self {
        Self { default_k, max_k }
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Recommends for `query` using `k`, or the default when `k` is `None`
    pub fn recommend(
        &self,
        model: &Model,
        query: &str,
        k: Option<usize>,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let k = k.unwrap_or(self.default_k);
        if k > self.max_k {
            return Err(RecommendError::InvalidArgument(format!(
                "k must be at most {}",
                self.max_k
            )));
        }

        let result = recommend(query, k, &model.index, &model.matrix);
        match &result {
            Ok(items) => tracing::debug!(query = %query, k, returned = items.len(), "Ranked recommendations"),
            Err(e) => tracing::debug!(query = %query, k, error = %e, "Recommendation rejected"),
        }
        result
    }
}
