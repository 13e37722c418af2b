//! Broadcast API module (customer-facing)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/broadcasts", post(handler::create_broadcast))
        .route("/api/broadcasts", get(handler::list_broadcasts))
        .route("/api/broadcasts/count", get(handler::count_active))
        .route("/api/broadcasts/{id}", get(handler::get_broadcast))
        .route(
            "/api/broadcasts/{id}/cancel",
            post(handler::cancel_broadcast),
        )
}
