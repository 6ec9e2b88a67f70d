//! Stockpilot: rule-based trading signals with portfolio persistence.
//!
//! The crate fronts four collaborators behind an HTTP API:
//! a daily price history provider, the pure signal & levels engine,
//! a portfolio/user document store, and a PDF report renderer.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;
pub mod session;
pub mod signals;
