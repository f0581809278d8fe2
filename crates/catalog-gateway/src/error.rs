//! API error types and responses.
//!
//! Every failure in the request pipeline becomes an [`ApiError`], and every
//! `ApiError` is rendered through the same envelope:
//!
//! ```text
//! { "status": "error", "errorType": "NotFoundError", "message": "Route not found" }
//! ```

use std::any::Any;

use axum::body::Body;
use axum::http::{header, Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use catalog_core::CoreError;
use catalog_store::StoreError;

/// Message returned for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing API key";

/// Message returned in place of internal error details.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing payload fields or query parameters.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid API key.
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// No matching resource or route.
    #[error("{0}")]
    NotFound(String),

    /// Request body larger than the configured limit.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Any unanticipated failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status: &'static str,
    error_type: &'static str,
    message: String,
}

impl ApiError {
    /// Shorthand for the terminal not-found handler.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::NotFound("Route not found".to_string())
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the machine-readable error type for this error.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Unauthorized => "UnauthorizedError",
            Self::NotFound(_) => "NotFoundError",
            Self::PayloadTooLarge => "PayloadTooLargeError",
            Self::Timeout => "TimeoutError",
            Self::Internal(_) => "InternalError",
        }
    }

    /// The message shown to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed with internal error");
        }

        let body = ErrorResponse {
            status: "error",
            error_type: self.error_type(),
            message: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(format!("store: {err}"))
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::InvalidId(_) => {
                Self::NotFound("Product not found".to_string())
            }
        }
    }
}

/// Render a caught handler panic as an `InternalError` envelope.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Handler panicked");

    let body = serde_json::json!({
        "status": "error",
        "errorType": "InternalError",
        "message": INTERNAL_MESSAGE,
    });

    let mut response = HttpResponse::new(Body::from(body.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
