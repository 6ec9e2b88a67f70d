//! Fixed deployment constants and the few supported environment overrides.
//!
//! The datastore target and timeout are deliberately constants with an env
//! escape hatch; externalizing the rest is a known gap, not a requirement.

use std::env;
use std::time::Duration;

/// Default Postgres target for the user/portfolio store.
pub const DEFAULT_DATABASE_URL: &str =
    "host=localhost port=5432 user=stockpilot dbname=stockpilot";

/// Bounded connection-establishment timeout, applied once at session start.
pub const STORE_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// History range requested from the price provider (daily bars).
pub const DEFAULT_HISTORY_RANGE: &str = "6mo";

/// Moving-average window for the best-entry level.
pub const DEFAULT_WINDOW: usize = 20;

/// Target is entry * (1 + TARGET_PCT).
pub const TARGET_PCT: f64 = 0.10;

/// Stop loss is entry * (1 - STOP_PCT).
pub const STOP_PCT: f64 = 0.05;

/// Fixed conversion rate for the INR metric view. Not fetched.
pub const USD_TO_INR: f64 = 83.0;

/// Base URL of the Yahoo Finance chart API.
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}
