//! Input validation for the shortening form
//!
//! Validation runs on the raw user input: no scheme is guessed before the check,
//! so `example.com` is rejected and the submission is blocked.

use url::Url;

use crate::error::ValidationError;
use crate::model::{ShortenForm, ShortenRequest, DEFAULT_EXPIRY_HOURS, EXPIRY_OPTIONS};

/// Returns true when `candidate` parses as an absolute URL with an authority
///
/// Uses WHATWG URL parsing. Opaque URLs such as `mailto:` or `javascript:` have no
/// host and are rejected, as are relative paths and empty strings.
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => !url.cannot_be_a_base() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Turns the posted form into a request ready for the shortening client
pub fn validate_form(form: ShortenForm) -> Result<ShortenRequest, ValidationError> {
    if !is_valid_url(&form.url) {
        return Err(ValidationError::InvalidUrl);
    }

    let expiry_hours = form.expiry.unwrap_or(DEFAULT_EXPIRY_HOURS);
    if !EXPIRY_OPTIONS.contains(&expiry_hours) {
        return Err(ValidationError::UnsupportedExpiry(expiry_hours));
    }

    let desired_alias = form
        .alias
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty());

    Ok(ShortenRequest {
        long_url: form.url,
        expiry_hours,
        desired_alias,
    })
}
