//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Opens the durable store (or falls back to offline mode)
//! - Starts the HTTP server with graceful shutdown support

use std::net::SocketAddr;
use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use portfolio::config::Config;
use portfolio::route::{cors_layer, create_app};
use portfolio::state::AppState;

/// Application entry point
///
/// # Environment Variables
///
/// - `PORT` - Server port number (default: 5000)
/// - `DATABASE_URL` - Path to database file (default: "portfolio.db")
/// - `APP_ENV` - "development" or "production"
/// - `FRONTEND_URL` - Allowed CORS origin in production
/// - `PORTFOLIO_DATA`, `GEO_DATA` - Optional data file overrides
/// - `VISIT_BUFFER_CAPACITY` - In-memory visit buffer size (default: 1000)
#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio=debug,tower_http=debug")),
        )
        .init();

    let config = Config::load();

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to initialize application state: {err}");
            return ExitCode::FAILURE;
        }
    };

    let app = create_app(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {addr}: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Portfolio API running at http://localhost:{} ({})",
        config.port, config.environment
    );

    // Connect info exposes the peer address to the visit recorder
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Server error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server");
}
