//! [`CarrierClient`]: issues signed, encrypted calls to the carrier and decodes replies.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Map, Value};
use tracing::{debug, field, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::envelope::{self, EnvelopeKeys};
use super::{CallState, CarrierCallError, Endpoint};
use crate::crypto::cipher;

/// Milliseconds added to the local clock when stamping a request, to absorb
/// clock skew against the carrier's validity window.
pub const TIMESTAMP_SKEW_MS: i64 = 500;

/// Source of wall-clock time for request timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> i64;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Carrier account credentials and endpoint root.
#[derive(Clone)]
pub struct Credentials {
    pub app_code: String,
    pub secret_key: String,
    /// Scheme and host, e.g. `https://uat-api.speedaf.com`. No trailing path.
    pub base_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_code", &self.app_code)
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

struct Inner {
    app_code: String,
    base_url: String,
    keys: EnvelopeKeys,
    http: reqwest::Client,
    clock: Arc<dyn Clock>,
}

/// Client for the carrier's open API.
///
/// Cheap to clone; all clones share credentials, derived key material and the
/// HTTP connection pool. Nothing is mutated after construction, so calls may
/// run concurrently on the same instance.
#[derive(Clone)]
pub struct CarrierClient {
    inner: Arc<Inner>,
}

impl CarrierClient {
    /// Build a client using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`CarrierCallError::Codec`] if the secret key is empty and
    /// [`CarrierCallError::Transport`] if the HTTP client cannot be built.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, CarrierCallError> {
        Self::with_clock(credentials, timeout, Arc::new(SystemClock))
    }

    /// Build a client with an explicit [`Clock`].
    pub fn with_clock(
        credentials: Credentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CarrierCallError> {
        let keys = EnvelopeKeys::new(&credentials.secret_key)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CarrierCallError::Transport)?;

        Ok(Self {
            inner: Arc::new(Inner {
                app_code: credentials.app_code,
                base_url: credentials.base_url.trim_end_matches('/').to_owned(),
                keys,
                http,
                clock,
            }),
        })
    }

    /// Create a new order. Returns the carrier result (including `billCode`).
    pub async fn create_order(&self, order: Map<String, Value>) -> Result<Value, CarrierCallError> {
        self.call(Endpoint::CreateOrder, &Value::Object(order)).await
    }

    /// Query tracking events for one or more waybill numbers.
    pub async fn query_track(&self, mail_nos: &[String]) -> Result<Value, CarrierCallError> {
        self.call(Endpoint::TrackQuery, &json!({ "mailNoList": mail_nos }))
            .await
    }

    /// Cancel an order. The carrier expects a one-element array.
    pub async fn cancel_order(
        &self,
        customer_code: &str,
        bill_code: &str,
        cancel_reason: &str,
    ) -> Result<Value, CarrierCallError> {
        let payload = json!([{
            "customerCode": customer_code,
            "billCode": bill_code,
            "cancelReason": cancel_reason,
        }]);
        self.call(Endpoint::CancelOrder, &payload).await
    }

    /// Update an existing order. The carrier expects a one-element array.
    pub async fn update_order(&self, order: Map<String, Value>) -> Result<Value, CarrierCallError> {
        self.call(Endpoint::UpdateOrder, &Value::Array(vec![Value::Object(order)]))
            .await
    }

    /// Seal `payload`, POST it to `endpoint`, and decode the carrier's answer.
    ///
    /// Exactly one HTTP attempt is made.
    pub async fn call(&self, endpoint: Endpoint, payload: &Value) -> Result<Value, CarrierCallError> {
        let span = info_span!(
            "carrier_call",
            endpoint = endpoint.name(),
            call_id = %Uuid::new_v4(),
            outcome = field::Empty,
        );

        async {
            let result = self.exchange(endpoint, payload).await;
            let outcome = CallState::terminal(&result);
            tracing::Span::current().record("outcome", outcome.as_str());
            match &result {
                Ok(_) => info!("carrier call succeeded"),
                Err(e) => warn!(error = %e, timed_out = e.is_timeout(), "carrier call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn exchange(&self, endpoint: Endpoint, payload: &Value) -> Result<Value, CarrierCallError> {
        let inner = &self.inner;

        // The signature binds to this exact value; it is taken once per call.
        let timestamp_ms = inner.clock.now_millis() + TIMESTAMP_SKEW_MS;
        debug!(state = CallState::Building.as_str(), timestamp_ms);
        let body = envelope::build_envelope(payload, timestamp_ms, &inner.keys)?;

        let url = format!("{}{}", inner.base_url, endpoint.path());
        let timestamp = timestamp_ms.to_string();
        let response = inner
            .http
            .post(&url)
            .query(&[("appCode", inner.app_code.as_str()), ("timestamp", timestamp.as_str())])
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(CarrierCallError::Transport)?;
        debug!(state = CallState::Sent.as_str(), status = %response.status());

        let raw: Bytes = response
            .error_for_status()
            .map_err(CarrierCallError::Transport)?
            .bytes()
            .await
            .map_err(CarrierCallError::Transport)?;

        decode_response(&raw, &inner.keys)
    }
}

impl std::fmt::Debug for CarrierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierClient")
            .field("app_code", &self.inner.app_code)
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Validate the outer `{success, data}` envelope and decrypt `data`.
pub fn decode_response(raw: &[u8], keys: &EnvelopeKeys) -> Result<Value, CarrierCallError> {
    let outer: Value = serde_json::from_slice(raw).map_err(|e| {
        CarrierCallError::Protocol(format!("carrier response is not valid JSON: {e}"))
    })?;

    let success = outer.get("success").map(is_truthy).unwrap_or(false);
    let data = match outer.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) if !success => None,
        Some(other) => {
            return Err(CarrierCallError::Protocol(format!(
                "carrier `data` must be a string, got {}",
                json_kind(other)
            )))
        }
    };

    let data = match (success, data) {
        (true, Some(d)) => d,
        _ => {
            return Err(CarrierCallError::Carrier {
                body: String::from_utf8_lossy(raw).into_owned(),
            })
        }
    };

    let plaintext = cipher::decrypt_text(data, keys.cipher())?;
    let text = String::from_utf8(plaintext).map_err(|e| {
        CarrierCallError::Protocol(format!("decrypted carrier data is not UTF-8: {e}"))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        CarrierCallError::Protocol(format!("decrypted carrier data is not valid JSON: {e}"))
    })
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
