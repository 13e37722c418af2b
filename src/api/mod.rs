//! API routing
//!
//! - [`health`] - liveness probe
//! - [`broadcasts`] - customer-facing broadcast endpoints
//! - [`pricing`] - seller-facing quote endpoints

pub mod broadcasts;
pub mod convert;
pub mod health;
pub mod pricing;

use std::time::Duration;

use axum::Router;
use http::HeaderValue;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(broadcasts::router())
        .merge(pricing::router())
}

/// Fully configured application with middleware and state applied
pub fn build_app(state: ServerState) -> Router {
    let request_id_header = http::HeaderName::from_static("x-request-id");
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    build_router()
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, XRequestId))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
