//! Laptop rating types.

use serde::{Deserialize, Serialize};

/// Running rating aggregate for one laptop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    /// Mean score, or `0.0` before any contribution.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// One inbound rate request. The score travels as text and is parsed by
/// the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    pub laptop_id: String,
    pub score: String,
}

impl RateRequest {
    pub fn new(laptop_id: impl Into<String>, score: impl Into<String>) -> Self {
        Self {
            laptop_id: laptop_id.into(),
            score: score.into(),
        }
    }
}

/// Rating state reported back after each accepted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResponse {
    pub laptop_id: String,
    pub rated_count: u32,
    pub average_score: f64,
}
