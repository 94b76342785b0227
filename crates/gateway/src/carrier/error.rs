//! Failure taxonomy for a single carrier call.

use common::ServiceError;
use thiserror::Error;

use super::Endpoint;
use crate::crypto::CodecError;

/// Every way a carrier call can end other than success.
///
/// All variants are terminal: the client never retries.
#[derive(Debug, Error)]
pub enum CarrierCallError {
    /// Ciphertext or padding was malformed, or the key was unusable.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The HTTP exchange itself failed: connect error, timeout, or non-2xx status.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The carrier answered `success: false` or omitted `data`.
    /// Holds the full outer response body.
    #[error("carrier rejected the request: {body}")]
    Carrier { body: String },

    /// The outer or inner response did not parse as the expected JSON.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl CarrierCallError {
    /// `true` when the transport gave up waiting for the carrier.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CarrierCallError::Transport(e) if e.is_timeout())
    }

    /// Map to the façade error for a call made against `endpoint`.
    ///
    /// A timed-out create-order is reported as an unknown outcome: the carrier
    /// may have created the order before the connection was abandoned.
    pub fn into_service_error(self, endpoint: Endpoint) -> ServiceError {
        if self.is_timeout() && endpoint.creates_resource() {
            return ServiceError::UnknownOutcome(format!(
                "{} timed out; the order may still have been created",
                endpoint.name()
            ));
        }
        match self {
            CarrierCallError::Transport(e) => ServiceError::CarrierUnreachable(e.to_string()),
            CarrierCallError::Carrier { body } => ServiceError::CarrierRejected(body),
            CarrierCallError::Codec(e) => ServiceError::CarrierProtocol(e.to_string()),
            CarrierCallError::Protocol(msg) => ServiceError::CarrierProtocol(msg),
        }
    }
}
