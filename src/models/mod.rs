//! Shared data models spanning the service layers.

pub mod portfolio;
pub mod price;
pub mod signal;
pub mod user;

pub use portfolio::PortfolioEntry;
pub use price::PriceBar;
pub use signal::{Signal, SignalLevels};
pub use user::UserAccount;
