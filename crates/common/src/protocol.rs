//! Request and response types exposed by the gateway's REST API.
//!
//! Field names are snake_case on the wire. Translation to the carrier's
//! camelCase payloads happens in the gateway's order builder, not here.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order building blocks
// ---------------------------------------------------------------------------

/// Sender contact and address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderInfo {
    pub name: String,
    pub mobile: String,
    pub address: String,
    /// ISO country code; defaults to `"CN"`.
    #[serde(default = "default_sender_country")]
    pub country_code: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn default_sender_country() -> String {
    "CN".into()
}

/// Receiver contact and address. Unlike the sender, the country is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverInfo {
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub country_code: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Parcel weight (kg) and optional dimensions (cm).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelInfo {
    pub weight: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_piece")]
    pub piece: u32,
}

fn default_piece() -> u32 {
    1
}

/// A single line item in the parcel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInfo {
    pub goods_name: String,
    pub goods_qty: u32,
    pub goods_value: f64,
    pub goods_weight: f64,
    /// Local-language name; falls back to `goods_name` when empty.
    #[serde(default)]
    pub goods_name_dialect: Option<String>,
    #[serde(default = "default_goods_type")]
    pub goods_type: String,
    #[serde(default)]
    pub sku: Option<String>,
}

fn default_goods_type() -> String {
    "IT02".into()
}

/// Carrier service options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOptions {
    #[serde(default = "default_delivery_type")]
    pub delivery_type: String,
    #[serde(default = "default_pay_method")]
    pub pay_method: String,
    #[serde(default = "default_parcel_type")]
    pub parcel_type: String,
    #[serde(default)]
    pub remark: Option<String>,
}

fn default_delivery_type() -> String {
    "DE01".into()
}
fn default_pay_method() -> String {
    "PA01".into()
}
fn default_parcel_type() -> String {
    "PT01".into()
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            delivery_type: default_delivery_type(),
            pay_method: default_pay_method(),
            parcel_type: default_parcel_type(),
            remark: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/order/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Caller-side order number; must be unique per customer.
    pub custom_order_no: String,
    pub customer_code: String,
    pub sender: SenderInfo,
    pub receiver: ReceiverInfo,
    pub parcel: ParcelInfo,
    pub items: Vec<ItemInfo>,
    #[serde(default)]
    pub service: Option<ServiceOptions>,
}

/// Request body for `POST /api/track/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackQueryRequest {
    pub mail_no_list: Vec<String>,
}

/// Request body for `POST /api/order/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub customer_code: String,
    pub bill_code: String,
    #[serde(default = "default_cancel_reason")]
    pub cancel_reason: String,
}

/// Cancel reason sent when the caller does not supply one.
pub fn default_cancel_reason() -> String {
    "customer cancel".into()
}

/// Request body for `POST /api/order/update`.
///
/// Only `bill_code` and `customer_code` are required; every other group is
/// forwarded to the carrier only when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub bill_code: String,
    pub customer_code: String,
    #[serde(default)]
    pub custom_order_no: Option<String>,
    #[serde(default)]
    pub sender: Option<SenderInfo>,
    #[serde(default)]
    pub receiver: Option<ReceiverInfo>,
    #[serde(default)]
    pub parcel: Option<ParcelInfo>,
    #[serde(default)]
    pub items: Option<Vec<ItemInfo>>,
    #[serde(default)]
    pub service: Option<ServiceOptions>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Successful response body for every carrier-backed endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Always `true`; failures use [`ErrorResponse`].
    pub success: bool,
    /// Decrypted carrier result, with the carrier's own field names.
    pub data: serde_json::Value,
    pub message: String,
}

impl ApiResponse {
    /// Wrap a carrier result with a human-readable message.
    pub fn ok(data: serde_json::Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"carrier_rejected"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process is serving.
    pub status: String,
    /// Unix time in seconds.
    pub timestamp: i64,
}
