//! Outletiq API Server
//!
//! HTTP API server with health check, metrics, and report endpoints.
//! The sales snapshot is loaded once at startup; every request computes
//! its report fresh from that snapshot, so the service is stateless and
//! can be horizontally scaled.

use dotenvy::dotenv;
use outletiq::config::Config;
use outletiq::core::http::start_server;
use outletiq::logging;
use std::env;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let env = outletiq::config::get_environment();
    let config = Config::from_env();
    info!("Starting Outletiq API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
