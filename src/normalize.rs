//! Normalization of shortening-service replies into canonical records
//!
//! Field names differ between service deployments. The fallback order lives here and
//! nowhere else:
//!
//! - code: `code`, `id`, last segment of `short_url`, last segment of `short`, else empty
//! - short URL: `short_url`, `short`, `{origin}/{code}`, then [`with_scheme`]

use chrono::{DateTime, Utc};

use crate::model::{RawServiceResponse, ShortLinkRecord, ShortenRequest};

/// Prefixes `http://` unless the URL already starts with `http://` or `https://`
///
/// The prefix check ignores ASCII case. Applying it twice gives the same result as once.
pub fn with_scheme(url: &str) -> String {
    if has_http_scheme(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Text after the last `/`, if not empty
fn last_segment(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Short identifier carried by the reply, or an empty string
pub fn extract_code(raw: &RawServiceResponse) -> String {
    RawServiceResponse::text(&raw.code)
        .or_else(|| RawServiceResponse::text(&raw.id))
        .or_else(|| RawServiceResponse::text(&raw.short_url).and_then(|u| last_segment(&u)))
        .or_else(|| RawServiceResponse::text(&raw.short).and_then(|u| last_segment(&u)))
        .unwrap_or_default()
}

/// Absolute short URL for the reply
///
/// `origin` stands in for the page origin when the service returned no URL at all.
pub fn derive_short_url(raw: &RawServiceResponse, code: &str, origin: &str) -> String {
    let chosen = RawServiceResponse::text(&raw.short_url)
        .or_else(|| RawServiceResponse::text(&raw.short))
        .unwrap_or_else(|| format!("{origin}/{code}"));

    with_scheme(chosen.trim())
}

/// Builds the canonical record for a successful exchange
pub fn normalize(
    request: &ShortenRequest,
    raw: &RawServiceResponse,
    origin: &str,
    created_at: DateTime<Utc>,
) -> ShortLinkRecord {
    let code = extract_code(raw);
    let short_url = derive_short_url(raw, &code, origin);

    ShortLinkRecord {
        original_url: request.long_url.clone(),
        short_url,
        code,
        expiry_hours: request.expiry_hours,
        created_at,
    }
}
