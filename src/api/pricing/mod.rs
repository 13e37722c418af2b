//! Pricing API module (seller-facing)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/pricing/requests", get(handler::list_requests))
        .route("/api/pricing/requests/count", get(handler::count_pending))
        .route(
            "/api/pricing/requests/{id}/submit",
            post(handler::submit_quote),
        )
}
