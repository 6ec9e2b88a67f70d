use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved position. Created only by an explicit user save, never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub owner: String,
    pub ticker: String,
    pub price: f64,
    pub entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub recorded_at: DateTime<Utc>,
}
