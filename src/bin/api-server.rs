//! Stockpilot API Server
//!
//! HTTP API fronting the signal engine, the price history provider, and the
//! user/portfolio store. One request runs to completion before the next.

use dotenvy::dotenv;
use stockpilot::core::http::start_server;
use stockpilot::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = stockpilot::config::get_port();
    let env = stockpilot::config::get_environment();
    info!("Starting Stockpilot API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        result = start_server(port) => {
            // A store-connect failure at startup lands here; propagating it
            // exits nonzero so supervisors see the session as fatal.
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(e);
            }
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
