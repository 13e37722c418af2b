//! Pricing API handlers

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::convert::parse_record_id;
use crate::core::{Result, ServerError, ServerState};
use crate::db::models::{LineItemInput, PricingRequest, PricingRequestStatus};
use crate::services::{BroadcastOrchestrator, PricingEngine, PricingOutcome};

#[derive(Deserialize, Validate)]
pub struct SubmitPricingRequest {
    pub seller_id: String,
    #[validate(length(min = 1, message = "A quote needs at least one line item"))]
    pub line_items: Vec<LineItemInput>,
    #[validate(range(min = 0.0, message = "Delivery fee cannot be negative"))]
    #[serde(default)]
    pub delivery_fee: f64,
}

/// POST /api/pricing/requests/{id}/submit
pub async fn submit_quote(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitPricingRequest>,
) -> Result<(StatusCode, Json<PricingOutcome>)> {
    req.validate()
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    let request_id = parse_record_id(&id, "pricing request")?;
    let seller_id = parse_record_id(&req.seller_id, "seller")?;

    let engine = PricingEngine::new(state.get_db());
    let outcome = engine
        .submit(&request_id, &seller_id, req.line_items, req.delivery_fee)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

#[derive(Deserialize)]
pub struct ListRequestsQuery {
    pub seller_id: String,
    /// Comma-separated status filter, e.g. `pending,claimed`
    pub status: Option<String>,
}

/// GET /api/pricing/requests?seller_id=&status=
pub async fn list_requests(
    State(state): State<ServerState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<PricingRequest>>> {
    let seller_id = parse_record_id(&query.seller_id, "seller")?;

    let statuses = query
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let requests = orchestrator
        .list_seller_requests(&seller_id, statuses)
        .await?;

    Ok(Json(requests))
}

fn parse_status_filter(raw: &str) -> Result<Vec<PricingRequestStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            PricingRequestStatus::from_str(s)
                .map_err(|_| ServerError::Validation(format!("Unknown request status: {s}")))
        })
        .collect()
}

#[derive(Deserialize)]
pub struct CountRequestsQuery {
    pub seller_id: String,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /api/pricing/requests/count?seller_id=
pub async fn count_pending(
    State(state): State<ServerState>,
    Query(query): Query<CountRequestsQuery>,
) -> Result<Json<CountResponse>> {
    let seller_id = parse_record_id(&query.seller_id, "seller")?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let count = orchestrator.count_pending(&seller_id).await?;

    Ok(Json(CountResponse { count }))
}
