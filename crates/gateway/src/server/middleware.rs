//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and permissive CORS for
//! browser-based workflow tools.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::ErrorResponse;
use tower_http::cors::{Any, CorsLayer};

/// Per-request timeout applied to all routes. Must exceed the carrier call
/// timeout, which config validation enforces.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// CORS policy: any origin, method, and header.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Give the empty 408 produced by the timeout layer a JSON error body.
pub async fn timeout_body(resp: Response) -> Response {
    if resp.status() != StatusCode::REQUEST_TIMEOUT {
        return resp;
    }
    let err = ErrorResponse::new(
        "request_timeout",
        format!("request exceeded {}s", REQUEST_TIMEOUT.as_secs()),
    );
    (StatusCode::REQUEST_TIMEOUT, Json(err)).into_response()
}
