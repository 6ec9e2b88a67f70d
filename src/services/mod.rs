//! External collaborators: price history providers.

pub mod market_data;
pub mod yahoo;

pub use market_data::MarketDataProvider;
pub use yahoo::YahooFinanceProvider;
