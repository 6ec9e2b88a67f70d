//! Error taxonomy, one enum per layer.
//!
//! Every variant is terminal to the current user interaction: there is no
//! retry, fallback data source, or partial recovery anywhere in the service.

use thiserror::Error;

/// Failures of the pure signal & levels computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    /// The provider returned no bars at all for the ticker.
    #[error("no price data available")]
    DataUnavailable,

    /// Fewer bars than the moving-average window. The engine fails closed
    /// rather than averaging over a short window.
    #[error("insufficient history: have {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },
}

/// Failures reaching or decoding the price history provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("price provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price provider returned an unexpected payload: {0}")]
    Decode(String),
}

/// Failures of the user/portfolio store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at session start. Fatal; there is no
    /// degraded or offline mode.
    #[error("portfolio store unreachable: {0}")]
    Unavailable(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    DuplicateUser,

    #[error("store query failed: {0}")]
    Query(String),
}

/// Failures producing the PDF trade report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf generation failed: {0}")]
    Pdf(String),

    #[error("report artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
