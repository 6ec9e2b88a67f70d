//! Yahoo Finance chart API market data provider.

pub mod messages;
pub mod provider;

pub use provider::YahooFinanceProvider;
