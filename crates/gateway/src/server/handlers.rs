//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        ApiResponse, CancelOrderRequest, CreateOrderRequest, ErrorResponse, HealthResponse,
        ServiceInfo, TrackQueryRequest, UpdateOrderRequest,
    },
    ServiceError,
};
use serde_json::Value;
use tracing::{info, warn};

use super::state::AppState;
use crate::carrier::{CarrierCallError, Endpoint};
use crate::order;

/// [`ServiceError`] rendered as an [`ErrorResponse`] with the matching status.
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ServiceError::BadRequest(rejection.body_text()))
    }
}

type ApiResult = Result<Json<ApiResponse>, ApiError>;

/// `GET /` — service banner.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "SpeedAF API Service".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        status: "running".into(),
    })
}

/// `GET /health` — liveness check. Does not contact the carrier.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// `POST /api/order/create` — build a full order and submit it.
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    require(&req.custom_order_no, "custom_order_no")?;
    require(&req.customer_code, "customer_code")?;

    let payload = order::create_order_payload(&req);
    let result = finish(Endpoint::CreateOrder, state.carrier.create_order(payload).await)?;
    if let Some(bill_code) = result.get("billCode").and_then(Value::as_str) {
        info!(bill_code, custom_order_no = %req.custom_order_no, "order created");
    }
    Ok(Json(ApiResponse::ok(result, "order created")))
}

/// `POST /api/track/query` — tracking events for one or more waybills.
pub async fn query_track(
    State(state): State<AppState>,
    body: Result<Json<TrackQueryRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    let result = finish(
        Endpoint::TrackQuery,
        state.carrier.query_track(&req.mail_no_list).await,
    )?;
    Ok(Json(ApiResponse::ok(result, "query succeeded")))
}

/// `POST /api/order/cancel` — cancel an order by bill code.
pub async fn cancel_order(
    State(state): State<AppState>,
    body: Result<Json<CancelOrderRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    require(&req.customer_code, "customer_code")?;
    require(&req.bill_code, "bill_code")?;

    let result = finish(
        Endpoint::CancelOrder,
        state
            .carrier
            .cancel_order(&req.customer_code, &req.bill_code, &req.cancel_reason)
            .await,
    )?;
    info!(bill_code = %req.bill_code, "cancel submitted");
    Ok(Json(ApiResponse::ok(result, "cancel request submitted")))
}

/// `POST /api/order/update` — send only the provided field groups.
pub async fn update_order(
    State(state): State<AppState>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = body?;
    require(&req.customer_code, "customer_code")?;
    require(&req.bill_code, "bill_code")?;

    let payload = order::update_order_payload(&req);
    let result = finish(Endpoint::UpdateOrder, state.carrier.update_order(payload).await)?;
    Ok(Json(ApiResponse::ok(result, "order updated")))
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn finish(endpoint: Endpoint, result: Result<Value, CarrierCallError>) -> Result<Value, ApiError> {
    result.map_err(|e| {
        let svc = e.into_service_error(endpoint);
        warn!(endpoint = endpoint.name(), code = svc.code(), "carrier call surfaced as error");
        ApiError(svc)
    })
}

fn require(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError(ServiceError::BadRequest(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Router};
    use axum_test::TestServer;
    use serde_json::json;

    use std::time::Duration;

    use crate::carrier::envelope::{self, EnvelopeKeys};
    use crate::carrier::{CarrierClient, Credentials};
    use crate::crypto::cipher;
    use crate::server::router;

    fn keys() -> EnvelopeKeys {
        EnvelopeKeys::new("uYMGr8eU").unwrap()
    }

    /// Carrier double that echoes the decrypted payload back under `echo`.
    async fn echo_carrier(body: String) -> String {
        let keys = keys();
        let payload = envelope::open_envelope(&body, &keys)
            .and_then(|env| env.payload())
            .unwrap();
        let inner = json!({"billCode": "NG0206830525525", "echo": payload});
        let data = cipher::encrypt_to_text(inner.to_string().as_bytes(), keys.cipher()).unwrap();
        json!({"success": true, "data": data}).to_string()
    }

    async fn rejecting_carrier(_body: String) -> String {
        r#"{"success":false,"error":{"code":"1001","message":"customerCode not exist"}}"#.into()
    }

    async fn slow_carrier(body: String) -> String {
        tokio::time::sleep(Duration::from_millis(800)).await;
        echo_carrier(body).await
    }

    async fn spawn_carrier(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn gateway_with(carrier: Router) -> TestServer {
        let base = spawn_carrier(carrier).await;
        TestServer::new(router::build(AppState::for_carrier(base))).unwrap()
    }

    fn echo_routes() -> Router {
        Router::new()
            .route("/open-api/express/order/createOrder", post(echo_carrier))
            .route("/open-api/express/track/query", post(echo_carrier))
            .route("/open-api/express/order/cancelOrder", post(echo_carrier))
            .route("/open-api/express/order/updateOrder", post(echo_carrier))
    }

    #[tokio::test]
    async fn root_reports_running() {
        let server = TestServer::new(router::build(AppState::for_carrier("http://127.0.0.1:9"))).unwrap();
        let body: Value = server.get("/").await.json();
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn health_does_not_need_carrier() {
        let server = TestServer::new(router::build(AppState::for_carrier("http://127.0.0.1:9"))).unwrap();
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn create_order_sends_built_payload() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/order/create")
            .json(&json!({
                "custom_order_no": "TEST1",
                "customer_code": "MA000027",
                "sender": {"name": "S", "mobile": "1", "address": "a"},
                "receiver": {"name": "R", "mobile": "2", "address": "b", "country_code": "NG"},
                "parcel": {"weight": 2.54},
                "items": [{"goods_name": "g", "goods_qty": 2, "goods_value": 190.0, "goods_weight": 1.45}]
            }))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "order created");
        assert_eq!(body["data"]["billCode"], "NG0206830525525");
        assert_eq!(body["data"]["echo"]["customOrderNo"], "TEST1");
        assert_eq!(body["data"]["echo"]["goodsQTY"], 2);
        assert_eq!(body["data"]["echo"]["deliveryType"], "DE01");
    }

    #[tokio::test]
    async fn track_query_forwards_mail_numbers() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/track/query")
            .json(&json!({"mail_no_list": ["ABC123"]}))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["data"]["echo"], json!({"mailNoList": ["ABC123"]}));
    }

    #[tokio::test]
    async fn cancel_sends_single_element_array() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/order/cancel")
            .json(&json!({"customer_code": "NG000660", "bill_code": "NG0206830525525"}))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(
            body["data"]["echo"],
            json!([{
                "customerCode": "NG000660",
                "billCode": "NG0206830525525",
                "cancelReason": "customer cancel"
            }])
        );
    }

    #[tokio::test]
    async fn update_sends_partial_order_in_array() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/order/update")
            .json(&json!({
                "bill_code": "47234208672823",
                "customer_code": "MA000027",
                "service": {"remark": "updated"}
            }))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(
            body["data"]["echo"],
            json!([{"billCode": "47234208672823", "customerCode": "MA000027", "remark": "updated"}])
        );
    }

    #[tokio::test]
    async fn carrier_rejection_is_502_with_body() {
        let carrier = Router::new().route("/open-api/express/order/cancelOrder", post(rejecting_carrier));
        let server = gateway_with(carrier).await;
        let resp = server
            .post("/api/order/cancel")
            .json(&json!({"customer_code": "X", "bill_code": "Y"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = resp.json();
        assert_eq!(body["code"], "carrier_rejected");
        assert!(body["message"].as_str().unwrap().contains("customerCode not exist"));
    }

    #[tokio::test]
    async fn unreachable_carrier_is_502() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let server = TestServer::new(router::build(AppState::for_carrier(format!("http://{addr}")))).unwrap();
        let resp = server
            .post("/api/track/query")
            .json(&json!({"mail_no_list": ["A"]}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = resp.json();
        assert_eq!(body["code"], "carrier_unreachable");
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/order/cancel")
            .json(&json!({"customer_code": "X"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json();
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn empty_mail_list_is_forwarded() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/track/query")
            .json(&json!({"mail_no_list": []}))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["data"]["echo"], json!({"mailNoList": []}));
    }

    #[tokio::test]
    async fn create_without_items_omits_item_fields() {
        let server = gateway_with(echo_routes()).await;
        let resp = server
            .post("/api/order/create")
            .json(&json!({
                "custom_order_no": "TEST2",
                "customer_code": "MA000027",
                "sender": {"name": "S", "mobile": "1", "address": "a"},
                "receiver": {"name": "R", "mobile": "2", "address": "b", "country_code": "NG"},
                "parcel": {"weight": 1.0},
                "items": []
            }))
            .await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        let echo = &body["data"]["echo"];
        assert_eq!(echo["customOrderNo"], "TEST2");
        assert!(echo.get("itemList").is_none());
        assert!(echo.get("goodsQTY").is_none());
    }

    #[tokio::test]
    async fn carrier_timeout_maps_per_endpoint() {
        let carrier = Router::new()
            .route("/open-api/express/order/createOrder", post(slow_carrier))
            .route("/open-api/express/track/query", post(slow_carrier));
        let base = spawn_carrier(carrier).await;
        let credentials = Credentials {
            app_code: "11111111".into(),
            secret_key: "uYMGr8eU".into(),
            base_url: base,
        };
        let client = CarrierClient::new(credentials, Duration::from_millis(100)).unwrap();
        let server = TestServer::new(router::build(AppState::new(client))).unwrap();

        let resp = server
            .post("/api/order/create")
            .json(&json!({
                "custom_order_no": "TEST3",
                "customer_code": "MA000027",
                "sender": {"name": "S", "mobile": "1", "address": "a"},
                "receiver": {"name": "R", "mobile": "2", "address": "b", "country_code": "NG"},
                "parcel": {"weight": 1.0},
                "items": []
            }))
            .await;
        assert_eq!(resp.status_code(), StatusCode::GATEWAY_TIMEOUT);
        let body: Value = resp.json();
        assert_eq!(body["code"], "unknown_outcome");

        let resp = server
            .post("/api/track/query")
            .json(&json!({"mail_no_list": ["A"]}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_GATEWAY);
        let body: Value = resp.json();
        assert_eq!(body["code"], "carrier_unreachable");
    }
}
