//! SpeedAF open-API client: envelope sealing, transport, and response decoding.
//!
//! # Call lifecycle
//!
//! ```text
//! Building ─▶ Sent ─▶ Succeeded
//!                  ├▶ CarrierRejected
//!                  ├▶ TransportFailed
//!                  └▶ ProtocolFailed
//! ```
//!
//! Every call is a single attempt. The terminal state is recorded as the
//! `outcome` field on the `carrier_call` span.
//!
//! # Telemetry invariants
//!
//! - The secret key, derived key material and decrypted bodies are never logged.

pub mod client;
pub mod envelope;
pub mod error;

pub use client::{CarrierClient, Clock, Credentials, SystemClock};
pub use error::CarrierCallError;

/// The carrier endpoints this gateway knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CreateOrder,
    TrackQuery,
    CancelOrder,
    UpdateOrder,
}

impl Endpoint {
    /// Path appended to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CreateOrder => "/open-api/express/order/createOrder",
            Endpoint::TrackQuery => "/open-api/express/track/query",
            Endpoint::CancelOrder => "/open-api/express/order/cancelOrder",
            Endpoint::UpdateOrder => "/open-api/express/order/updateOrder",
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::CreateOrder => "create_order",
            Endpoint::TrackQuery => "track_query",
            Endpoint::CancelOrder => "cancel_order",
            Endpoint::UpdateOrder => "update_order",
        }
    }

    /// Whether a call may create carrier-side state that a timeout leaves
    /// unaccounted for.
    pub fn creates_resource(self) -> bool {
        matches!(self, Endpoint::CreateOrder)
    }
}

/// Per-call state, surfaced in tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Building,
    Sent,
    Succeeded,
    CarrierRejected,
    TransportFailed,
    ProtocolFailed,
}

impl CallState {
    pub fn as_str(self) -> &'static str {
        match self {
            CallState::Building => "building",
            CallState::Sent => "sent",
            CallState::Succeeded => "succeeded",
            CallState::CarrierRejected => "carrier_rejected",
            CallState::TransportFailed => "transport_failed",
            CallState::ProtocolFailed => "protocol_failed",
        }
    }

    /// Terminal state reached by a finished call.
    pub fn terminal<T>(result: &Result<T, CarrierCallError>) -> Self {
        match result {
            Ok(_) => CallState::Succeeded,
            Err(CarrierCallError::Carrier { .. }) => CallState::CarrierRejected,
            Err(CarrierCallError::Transport(_)) => CallState::TransportFailed,
            Err(CarrierCallError::Codec(_)) | Err(CarrierCallError::Protocol(_)) => {
                CallState::ProtocolFailed
            }
        }
    }
}
