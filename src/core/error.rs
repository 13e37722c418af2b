use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::BroadcastError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] BroadcastError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ServerError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ServerError::Domain(err) => (domain_status(err), err.code(), err.to_string()),
            ServerError::Internal(err) => {
                // Log internals but do not expose details to clients
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// HTTP status for each domain error kind
fn domain_status(err: &BroadcastError) -> StatusCode {
    match err {
        BroadcastError::NoSellersProvided
        | BroadcastError::TooManySellers
        | BroadcastError::DuplicateSeller
        | BroadcastError::SellerNotFound(_)
        | BroadcastError::SellerInactive(_)
        | BroadcastError::SellerNotCapable(_)
        | BroadcastError::EmptyPayload
        | BroadcastError::InvalidLineItems(_) => StatusCode::BAD_REQUEST,
        BroadcastError::NotFound => StatusCode::NOT_FOUND,
        BroadcastError::Unauthorized => StatusCode::FORBIDDEN,
        BroadcastError::NotActive
        | BroadcastError::AlreadyClaimedOrPriced
        | BroadcastError::ClaimLost => StatusCode::CONFLICT,
        BroadcastError::DeadlineExpired => StatusCode::GONE,
        BroadcastError::FanOut(_)
        | BroadcastError::OrderMaterialization(_)
        | BroadcastError::LineItemInsert(_)
        | BroadcastError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Result type alias for HTTP handlers
pub type Result<T> = std::result::Result<T, ServerError>;
