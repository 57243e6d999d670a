//! Data models for the shortener client
//!
//! This module defines the structures that flow through the submission pipeline:
//! the form posted by the page, the validated request, the loosely shaped reply of
//! the remote service and the canonical record kept in the history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Expiry choices offered by the form, in hours
pub const EXPIRY_OPTIONS: [u32; 7] = [1, 6, 12, 24, 48, 72, 168];

/// Expiry used when the form leaves the field out
pub const DEFAULT_EXPIRY_HOURS: u32 = 24;

/// Canonical short-link record stored in the history
///
/// Created once when a service reply is normalized and never mutated afterwards.
///
/// # Example
/// ```json
/// {
///   "originalUrl": "https://example.com/article/123",
///   "shortUrl": "http://localhost:3000/xy12",
///   "code": "xy12",
///   "expiryHours": 24,
///   "createdAt": "2026-01-17T13:40:00Z"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkRecord {
    /// The URL exactly as the user submitted it
    #[serde(alias = "url")]
    pub original_url: String,

    /// Absolute short URL, always carrying an explicit http(s) scheme
    #[serde(alias = "short")]
    pub short_url: String,

    /// Short identifier extracted from the reply, empty when unrecoverable
    ///
    /// Older stored histories may hold a numeric code; it is read back as text.
    #[serde(default, deserialize_with = "code_text")]
    pub code: String,

    /// Expiry echoed from the request (the service's real expiry is not verified)
    #[serde(alias = "expiry")]
    pub expiry_hours: u32,

    /// Client clock at the moment the reply was received
    #[serde(alias = "at")]
    pub created_at: DateTime<Utc>,
}

/// Reads a stored code that may be a string, a number or missing
fn code_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(RawServiceResponse::text(&value).unwrap_or_default())
}

/// Validated input for one shortening exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenRequest {
    /// Absolute URL to shorten
    pub long_url: String,

    /// Requested lifetime of the short link in hours
    pub expiry_hours: u32,

    /// Alias typed by the user. Collected but not sent to the service.
    pub desired_alias: Option<String>,
}

/// Request payload posted by the page to `/api/shorten`
///
/// # Example
/// ```json
/// {
///   "url": "https://example.com/very/long/url",
///   "expiry": 48,
///   "alias": "my-link"  // Optional
/// }
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct ShortenForm {
    /// Raw URL typed by the user, validated as-is
    pub url: String,

    /// Expiry in hours, one of [`EXPIRY_OPTIONS`]; defaults to 24
    #[serde(default)]
    pub expiry: Option<u32>,

    /// Optional custom alias
    #[serde(default)]
    pub alias: Option<String>,
}

/// Body sent to `POST {base}/api/v1`
#[derive(Serialize, Debug)]
pub struct OutboundPayload<'a> {
    pub url: &'a str,
    pub expiry: u32,
}

/// Reply of the remote service, every field optional
///
/// Deployments disagree on field names, so nothing here is trusted. Values are kept
/// as raw JSON and read through [`RawServiceResponse::text`].
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct RawServiceResponse {
    pub code: Option<Value>,
    pub id: Option<Value>,
    pub short_url: Option<Value>,
    pub short: Option<Value>,
    pub message: Option<Value>,
}

impl RawServiceResponse {
    /// Builds a response from any JSON value. Non-object bodies carry no fields.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Text of a field when it is a non-empty string or a number
    pub fn text(field: &Option<Value>) -> Option<String> {
        match field {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Failure message supplied by the service, if any
    pub fn message(&self) -> Option<String> {
        match &self.message {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Listing returned by `GET /api/history`
#[derive(Serialize, Debug)]
pub struct HistoryPage {
    pub total: usize,
    pub limit: usize,
    pub data: Vec<ShortLinkRecord>,
}

/// Settings the page shows next to the form
#[derive(Serialize, Debug)]
pub struct ClientSettings {
    pub api_base: String,
    pub expiry_options: &'static [u32],
    pub default_expiry: u32,
}
