//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/order/create", post(handlers::create_order))
        .route("/api/track/query", post(handlers::query_track))
        .route("/api/order/cancel", post(handlers::cancel_order))
        .route("/api/order/update", post(handlers::update_order))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(axum::middleware::map_response(middleware::timeout_body))
        .layer(middleware::cors())
        .with_state(state)
}
