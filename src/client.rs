//! Client for the remote shortening service
//!
//! One exchange per call: `POST {base}/api/v1` with `{ "url", "expiry" }`, then the
//! reply is normalized into a [`ShortLinkRecord`]. The client never touches the history.

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::error::{ClientError, GENERIC_FAILURE};
use crate::model::{OutboundPayload, RawServiceResponse, ShortLinkRecord, ShortenRequest};
use crate::normalize::normalize;

#[derive(Clone, Debug)]
pub struct ShorteningClient {
    http: Client,
    base_address: String,
    origin: String,
}

impl ShorteningClient {
    /// Creates a client for `base_address`
    ///
    /// `origin` is used to synthesize a short URL when the service returns none.
    /// No timeout is set: a request runs until the transport gives up.
    pub fn new(base_address: &str, origin: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_address: base_address.to_string(),
            origin: origin.to_string(),
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/v1", self.base_address)
    }

    /// Shortens `request.long_url`
    ///
    /// The alias is deliberately not part of the outbound body.
    pub async fn shorten(&self, request: &ShortenRequest) -> Result<ShortLinkRecord, ClientError> {
        let payload = OutboundPayload {
            url: &request.long_url,
            expiry: request.expiry_hours,
        };

        tracing::debug!(endpoint = %self.endpoint(), url = %request.long_url, "sending shorten request");

        let res = self.http.post(self.endpoint()).json(&payload).send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|value| RawServiceResponse::from_value(value).message())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::warn!(%status, %message, "shortening service rejected request");
            return Err(ClientError::RequestFailed(message));
        }

        let value: Value = serde_json::from_slice(&body)?;
        let raw = RawServiceResponse::from_value(value);
        let record = normalize(request, &raw, &self.origin, Utc::now());

        tracing::info!(short_url = %record.short_url, code = %record.code, "short link created");
        Ok(record)
    }
}
