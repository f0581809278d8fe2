//! API key authentication.
//!
//! Every catalog route carries an [`ApiKey`](crate::dispatch::Guard::ApiKey)
//! guard that calls [`authenticate`] with the `x-api-key` header value. A
//! denied request never reaches validation or its handler.

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Outcome of an authentication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The supplied key matches the configured secret.
    Allowed,
    /// The key is missing, empty, or wrong.
    Denied,
}

/// Check a supplied key against the configured secret.
///
/// The comparison is exact, case-sensitive and constant-time. An empty
/// configured secret denies every request.
#[must_use]
pub fn authenticate(provided: Option<&str>, secret: &str) -> AuthOutcome {
    let Some(provided) = provided else {
        return AuthOutcome::Denied;
    };
    if secret.is_empty() {
        return AuthOutcome::Denied;
    }

    let provided = provided.as_bytes();
    let expected = secret.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing independent of the length mismatch.
        let _ = expected.ct_eq(expected);
        return AuthOutcome::Denied;
    }

    if bool::from(provided.ct_eq(expected)) {
        AuthOutcome::Allowed
    } else {
        AuthOutcome::Denied
    }
}

/// Run the API key check against request headers.
///
/// A header that is not valid visible ASCII counts as missing.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` when the check is denied.
pub fn require_api_key(headers: &HeaderMap, secret: &str) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match authenticate(provided, secret) {
        AuthOutcome::Allowed => Ok(()),
        AuthOutcome::Denied => {
            tracing::debug!(key_present = provided.is_some(), "API key rejected");
            Err(ApiError::Unauthorized)
        }
    }
}
