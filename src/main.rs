//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Opens the history database and rehydrates the history
//! - Starts the companion HTTP service with graceful shutdown support

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shortener_client::client::ShorteningClient;
use shortener_client::config::Config;
use shortener_client::database::init_db;
use shortener_client::history::{HistoryStore, RedbBackend};
use shortener_client::route::create_app;
use shortener_client::state::AppState;

/// Application entry point
///
/// See [`Config`] for the environment variables read at startup.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shortener_client=debug,tower_http=debug")),
        )
        .init();

    // Read PORT, DATABASE_URL, PUBLIC_ORIGIN and SHORTENER_API_URL once
    let config = Config::from_env();

    // Open the embedded database and rehydrate the history from it
    let db = init_db(&config.database_url).expect("Failed to initialize database");
    let history = HistoryStore::load(RedbBackend::new(Arc::new(db)));

    // Build the client for the remote shortening service
    let client = ShorteningClient::new(&config.api_base, &config.public_origin)
        .expect("Failed to build HTTP client");

    // Create the Axum router with all routes configured
    let state = AppState::new(client, history);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    // Bind to all network interfaces on the specified port
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind address");

    // Print startup information
    println!("🚀 Companion service running at {}", config.public_origin);
    println!("🔗 Shortening API: {}", config.api_base);
    println!("📂 History database: {}", config.database_url);

    // Start the server; it runs until SIGTERM or SIGINT arrives
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
///
/// History writes are synchronous, so by the time the server stops no write is half done.
async fn shutdown_signal() {
    // Handle Ctrl+C (SIGINT)
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    // Handle SIGTERM on Unix systems (Linux, macOS)
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    // On non-Unix systems (Windows), only handle Ctrl+C
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Wait for either signal to be received
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    println!("\n🛑 Shutdown signal received, stopping server.");
}
