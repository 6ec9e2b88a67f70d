//! Yahoo Finance market data provider implementation.

use chrono::DateTime;
use reqwest::StatusCode;
use tracing::debug;

use super::messages::ChartResponse;
use crate::config;
use crate::error::ProviderError;
use crate::models::PriceBar;
use crate::services::market_data::MarketDataProvider;

pub struct YahooFinanceProvider {
    base_url: String,
    client: reqwest::Client,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        Self::with_client(config::YAHOO_BASE_URL.to_string(), reqwest::Client::new())
    }

    /// Build against an explicit base URL; tests point this at a mock server.
    pub fn with_client(base_url: String, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }
}

impl Default for YahooFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn fetch_daily(
        &self,
        ticker: &str,
        range: &str,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        let response = self
            .client
            .get(self.chart_url(ticker))
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await?;

        // Yahoo answers 404 with an error body for unknown symbols; that is
        // "no data", not a transport failure.
        if response.status() == StatusCode::NOT_FOUND {
            debug!(ticker = %ticker, "chart endpoint returned 404, treating as no data");
            return Ok(Vec::new());
        }

        let body: ChartResponse = response.error_for_status()?.json().await?;

        if let Some(err) = body.chart.error {
            debug!(ticker = %ticker, code = %err.code, description = %err.description,
                "chart endpoint returned an error payload");
            return Ok(Vec::new());
        }

        let Some(result) = body.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) else {
            return Ok(Vec::new());
        };

        let closes = result
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or(&[]);

        if result.timestamp.len() != closes.len() {
            return Err(ProviderError::Decode(format!(
                "timestamp/close length mismatch: {} vs {}",
                result.timestamp.len(),
                closes.len()
            )));
        }

        // Null closes (days with no trade print) are skipped.
        let mut bars = Vec::with_capacity(closes.len());
        for (ts, close) in result.timestamp.iter().zip(closes) {
            let Some(close) = close else { continue };
            let date = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| {
                    ProviderError::Decode(format!("invalid bar timestamp: {}", ts))
                })?
                .date_naive();
            bars.push(PriceBar::new(date, *close));
        }

        debug!(ticker = %ticker, bars = bars.len(), "fetched daily history");
        Ok(bars)
    }
}
