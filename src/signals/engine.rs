//! The signal & levels engine.
//!
//! A pure function from a chronological close-price series to an
//! entry/target/stop-loss triple and a BUY/SELL/HOLD signal. No I/O, no
//! side effects; identical input yields bit-identical output.

use crate::config;
use crate::error::SignalError;
use crate::models::{PriceBar, Signal, SignalLevels};

/// Parameters of the levels computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelParams {
    /// Moving-average window for the best-entry level. Must be >= 1.
    pub window: usize,
    pub target_pct: f64,
    pub stop_pct: f64,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            window: config::DEFAULT_WINDOW,
            target_pct: config::TARGET_PCT,
            stop_pct: config::STOP_PCT,
        }
    }
}

impl LevelParams {
    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }
}

/// Compute levels and signal from daily bars.
///
/// `best_entry` is the arithmetic mean of the most recent `window` closes,
/// rounded to 2 decimals; `target` and `stop_loss` scale it by the
/// configured percentages. The signal favors BUY on a tie at the entry and
/// SELL on a tie at the target, with the BUY check evaluated first.
///
/// Fails closed: an empty series is [`SignalError::DataUnavailable`] and a
/// series shorter than `window` is [`SignalError::InsufficientHistory`].
/// A short window is never silently averaged over.
pub fn compute(bars: &[PriceBar], params: &LevelParams) -> Result<SignalLevels, SignalError> {
    if bars.is_empty() {
        return Err(SignalError::DataUnavailable);
    }
    if bars.len() < params.window {
        return Err(SignalError::InsufficientHistory {
            have: bars.len(),
            need: params.window,
        });
    }

    let latest_price = bars[bars.len() - 1].close;

    let tail = &bars[bars.len() - params.window..];
    let moving_average: f64 =
        tail.iter().map(|b| b.close).sum::<f64>() / params.window as f64;

    let best_entry = round2(moving_average);
    let target = round2(best_entry * (1.0 + params.target_pct));
    let stop_loss = round2(best_entry * (1.0 - params.stop_pct));

    let signal = if latest_price <= best_entry {
        Signal::Buy
    } else if latest_price >= target {
        Signal::Sell
    } else {
        Signal::Hold
    };

    Ok(SignalLevels {
        latest_price,
        best_entry,
        target,
        stop_loss,
        signal,
    })
}

/// Round to exactly 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
