//! Laptop rating aggregates.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::Rating;
use crate::{PcbookError, Result};

/// Per-laptop running `(count, sum)` of submitted scores.
pub trait RatingStore: Send + Sync {
    /// Add `score` to the aggregate for `laptop_id` and return the updated
    /// aggregate. Updates to one key never interleave.
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating>;

    /// Current aggregate, `None` before the first score.
    fn get(&self, laptop_id: &str) -> Result<Option<Rating>>;
}

/// [`RatingStore`] kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, laptop_id: &str, score: f64) -> Result<Rating> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|e| PcbookError::Internal(format!("rating store lock poisoned: {e}")))?;
        let rating = ratings.entry(laptop_id.to_string()).or_default();
        rating.count += 1;
        rating.sum += score;
        Ok(*rating)
    }

    fn get(&self, laptop_id: &str) -> Result<Option<Rating>> {
        Ok(self
            .ratings
            .read()
            .map_err(|e| PcbookError::Internal(format!("rating store lock poisoned: {e}")))?
            .get(laptop_id)
            .copied())
    }
}
