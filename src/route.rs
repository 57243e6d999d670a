//! Route definitions for the shortener companion service
//!
//! This module maps the page's actions onto HTTP routes and attaches the shared state.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handler::{client_settings, clear_history, list_history, remove_history_entry, submit_shorten};
use crate::state::AppState;

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `POST /api/shorten` - Validates, shortens and records a URL
/// - `GET /api/history` - Lists recent short links, newest first
/// - `DELETE /api/history` - Clears the history
/// - `DELETE /api/history/{index}` - Removes one entry by position
/// - `GET /api/config` - Base address and expiry choices shown by the page
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use shortener_client::client::ShorteningClient;
/// # use shortener_client::database::init_db;
/// # use shortener_client::history::{HistoryStore, RedbBackend};
/// # use shortener_client::route::create_app;
/// # use shortener_client::state::AppState;
/// # let db = init_db("history.db").unwrap();
/// let client = ShorteningClient::new("http://localhost:3000", "http://localhost:8080").unwrap();
/// let history = HistoryStore::load(RedbBackend::new(Arc::new(db)));
/// let app = create_app(AppState::new(client, history));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/shorten", post(submit_shorten))
        .route("/history", get(list_history).delete(clear_history))
        .route("/history/{index}", delete(remove_history_entry))
        .route("/config", get(client_settings));

    Router::new().nest("/api", api_routes).with_state(state)
}
