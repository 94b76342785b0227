//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::UnknownOutcome`] → 504
/// - [`ServiceError::CarrierUnreachable`], [`ServiceError::CarrierRejected`],
///   [`ServiceError::CarrierProtocol`] → 502
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body was malformed or missing required fields.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The carrier could not be reached, or answered with a non-2xx status.
    #[error("carrier unreachable: {0}")]
    CarrierUnreachable(String),

    /// The carrier answered with `success: false` or without a `data` field.
    #[error("carrier rejected the request: {0}")]
    CarrierRejected(String),

    /// The carrier response could not be decrypted or parsed.
    #[error("carrier protocol error: {0}")]
    CarrierProtocol(String),

    /// A state-changing call timed out; the carrier may or may not have applied it.
    #[error("outcome unknown: {0}")]
    UnknownOutcome(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::CarrierUnreachable(_) => 502,
            ServiceError::CarrierRejected(_) => 502,
            ServiceError::CarrierProtocol(_) => 502,
            ServiceError::UnknownOutcome(_) => 504,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in [`crate::protocol::ErrorResponse`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::CarrierUnreachable(_) => "carrier_unreachable",
            ServiceError::CarrierRejected(_) => "carrier_rejected",
            ServiceError::CarrierProtocol(_) => "carrier_protocol_error",
            ServiceError::UnknownOutcome(_) => "unknown_outcome",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(
            ServiceError::CarrierUnreachable("x".into()).http_status(),
            502
        );
        assert_eq!(ServiceError::CarrierRejected("x".into()).http_status(), 502);
        assert_eq!(ServiceError::CarrierProtocol("x".into()).http_status(), 502);
        assert_eq!(ServiceError::UnknownOutcome("x".into()).http_status(), 504);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_distinct_per_kind() {
        assert_eq!(ServiceError::CarrierRejected("x".into()).code(), "carrier_rejected");
        assert_eq!(ServiceError::UnknownOutcome("x".into()).code(), "unknown_outcome");
        assert_ne!(
            ServiceError::CarrierUnreachable("x".into()).code(),
            ServiceError::CarrierProtocol("x".into()).code()
        );
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::CarrierRejected("{\"success\":false}".into());
        assert!(e.to_string().contains("\"success\":false"));
    }
}
