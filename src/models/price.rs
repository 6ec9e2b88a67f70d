use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar of price history. Sequences are chronological, one bar per
/// trading day, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}
