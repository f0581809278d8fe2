//! Request logging and rejection middleware.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Record the method and path of every request before any other processing.
pub async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        "Incoming request"
    );
    next.run(request).await
}

/// Rewrite body-limit and timeout rejections from the tower-http layers into
/// the JSON error envelope.
///
/// Responses that already carry a JSON body came from the dispatcher and pass
/// through unchanged.
pub async fn envelope_layer_rejections(response: Response) -> Response {
    let error = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout,
        _ => return response,
    };

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    tracing::debug!(status = %response.status(), "Request rejected by middleware");
    error.into_response()
}
