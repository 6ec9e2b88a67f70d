//! Market data provider interface.

use crate::error::ProviderError;
use crate::models::PriceBar;

/// Source of daily OHLC history.
///
/// An unknown ticker or an empty lookback window yields `Ok(vec![])`; the
/// caller is responsible for short-circuiting on an empty series. Transport
/// and decode failures are `ProviderError`s.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get daily bars for a ticker over a lookback range such as `"6mo"`,
    /// ordered oldest first.
    async fn fetch_daily(&self, ticker: &str, range: &str)
        -> Result<Vec<PriceBar>, ProviderError>;
}
