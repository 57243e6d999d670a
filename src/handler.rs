//! HTTP request handlers for the shortener companion service
//!
//! This module implements the page's actions:
//! - Submitting a URL for shortening and recording the result
//! - Listing the recent history
//! - Removing a history entry by position
//! - Clearing the history

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::{AppError, ValidationError};
use crate::history::HISTORY_LIMIT;
use crate::model::{ClientSettings, HistoryPage, ShortenForm, DEFAULT_EXPIRY_HOURS, EXPIRY_OPTIONS};
use crate::state::AppState;
use crate::validate::validate_form;

/// Shortens a URL and prepends the result to the history
///
/// 1. Validates the raw URL and the expiry choice
/// 2. Claims the single in-flight slot
/// 3. Runs the exchange and the history prepend in a spawned task, so both finish even
///    if the caller goes away
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/url",
///   "expiry": 24,
///   "alias": "my-link"  // Optional, not forwarded
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - the new ShortLinkRecord
/// - **400 Bad Request** - unreadable body, invalid URL or expiry
/// - **409 Conflict** - another submission is still running
/// - **502 Bad Gateway** - the shortening service failed; `error` holds its message
pub async fn submit_shorten(
    State(state): State<AppState>,
    payload: Result<Json<ShortenForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Report body problems in the same JSON shape as every other error
    let Json(form) = payload.map_err(|e| ValidationError::MalformedBody(e.body_text()))?;

    // Check the raw URL and expiry before anything leaves the process
    let request = validate_form(form)?;

    // Only one submission may be outstanding at a time
    let in_flight = state.gate.try_enter()?;

    if let Some(alias) = &request.desired_alias {
        tracing::debug!(%alias, "alias collected but not forwarded");
    }

    // Run the exchange and the history prepend in their own task so they finish
    // even if this request is dropped; the gate is released when the task ends
    let task = tokio::spawn(async move {
        let _in_flight = in_flight;
        let record = state.client.shorten(&request).await?;

        // Prepend and write through to storage
        state.history().append(record.clone())?;
        Ok::<_, AppError>(record)
    });

    let record = task
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Lists the history, newest first
///
/// # Response
///
/// ```json
/// {
///   "total": 2,
///   "limit": 20,
///   "data": [...]
/// }
/// ```
pub async fn list_history(State(state): State<AppState>) -> impl IntoResponse {
    // Copy the records out under the lock
    let history = state.history();
    Json(HistoryPage {
        total: history.len(),
        limit: HISTORY_LIMIT,
        data: history.records().to_vec(),
    })
}

/// Removes the history entry at `index` (0 = newest)
///
/// - **200 OK** - entry removed, returned under `removed`
/// - **400 Bad Request** - the position is not a number
/// - **404 Not Found** - no entry at that position
pub async fn remove_history_entry(
    index: Result<Path<usize>, PathRejection>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let Path(index) = index.map_err(|e| ValidationError::InvalidPosition(e.body_text()))?;

    // Remove and write through; an invalid position changes nothing
    let removed = state.history().remove_at(index)?;

    Ok(Json(json!({
        "message": "History entry removed",
        "removed": removed
    })))
}

/// Clears the whole history
pub async fn clear_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let removed_count = state.history().clear()?;

    Ok(Json(json!({
        "message": "History cleared",
        "removed_count": removed_count
    })))
}

/// Settings the page displays: the service base address and the expiry choices
pub async fn client_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(ClientSettings {
        api_base: state.client.base_address().to_string(),
        expiry_options: &EXPIRY_OPTIONS,
        default_expiry: DEFAULT_EXPIRY_HOURS,
    })
}
