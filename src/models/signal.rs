use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading signal derived from the latest price against the computed levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Output of the signal & levels engine. Derived entirely from a price
/// series; ephemeral unless explicitly saved to the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalLevels {
    pub latest_price: f64,
    pub best_entry: f64,
    pub target: f64,
    pub stop_loss: f64,
    pub signal: Signal,
}
