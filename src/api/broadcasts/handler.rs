//! Broadcast API handlers

use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::convert::parse_record_id;
use crate::core::{Result, ServerError, ServerState};
use crate::db::models::{Broadcast, InputKind, OrderKind, PricingRequest};
use crate::services::{BroadcastOrchestrator, BroadcastWithRequests, NewBroadcast};

#[derive(Deserialize, Validate)]
pub struct CreateBroadcastRequest {
    pub customer_id: String,
    pub input_kind: InputKind,
    #[validate(length(max = 5000, message = "Request text is limited to 5000 characters"))]
    pub text: Option<String>,
    pub voice_reference: Option<String>,
    #[validate(length(max = 5, message = "At most 5 images per broadcast"))]
    pub image_references: Option<Vec<String>>,
    #[validate(length(max = 1000, message = "Notes are limited to 1000 characters"))]
    pub notes: Option<String>,
    pub seller_ids: Vec<String>,
    pub delivery_address_id: Option<String>,
    #[serde(default = "default_order_kind")]
    pub order_kind: OrderKind,
}

fn default_order_kind() -> OrderKind {
    OrderKind::Pickup
}

#[derive(Serialize)]
pub struct CreateBroadcastResponse {
    pub broadcast: Broadcast,
    pub requests: Vec<PricingRequest>,
}

/// POST /api/broadcasts
pub async fn create_broadcast(
    State(state): State<ServerState>,
    Json(req): Json<CreateBroadcastRequest>,
) -> Result<(StatusCode, Json<CreateBroadcastResponse>)> {
    req.validate()
        .map_err(|e| ServerError::Validation(e.to_string()))?;

    let customer_id = parse_record_id(&req.customer_id, "customer")?;
    let seller_ids = req
        .seller_ids
        .iter()
        .map(|s| parse_record_id(s, "seller"))
        .collect::<Result<Vec<_>>>()?;
    let delivery_address_id = req
        .delivery_address_id
        .as_deref()
        .map(|s| parse_record_id(s, "address"))
        .transpose()?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let (broadcast, requests) = orchestrator
        .create(NewBroadcast {
            customer_id,
            input_kind: req.input_kind,
            text: req.text,
            voice_reference: req.voice_reference,
            image_references: req.image_references,
            notes: req.notes,
            seller_ids,
            delivery_address_id,
            order_kind: req.order_kind,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBroadcastResponse {
            broadcast,
            requests,
        }),
    ))
}

#[derive(Deserialize)]
pub struct CancelBroadcastRequest {
    pub customer_id: String,
}

#[derive(Serialize)]
pub struct CancelBroadcastResponse {
    pub cancelled: bool,
}

/// POST /api/broadcasts/{id}/cancel
pub async fn cancel_broadcast(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<CancelBroadcastRequest>,
) -> Result<Json<CancelBroadcastResponse>> {
    let broadcast_id = parse_record_id(&id, "broadcast")?;
    let customer_id = parse_record_id(&req.customer_id, "customer")?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    orchestrator.cancel(&broadcast_id, &customer_id).await?;

    Ok(Json(CancelBroadcastResponse { cancelled: true }))
}

#[derive(Deserialize)]
pub struct GetBroadcastQuery {
    pub requester_id: String,
}

/// GET /api/broadcasts/{id}?requester_id=
pub async fn get_broadcast(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<GetBroadcastQuery>,
) -> Result<Json<BroadcastWithRequests>> {
    let broadcast_id = parse_record_id(&id, "broadcast")?;
    let requester_id = parse_record_id(&query.requester_id, "customer")?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let view = orchestrator
        .get_with_requests(&broadcast_id, &requester_id)
        .await?;

    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct ListBroadcastsQuery {
    pub customer_id: String,
    #[serde(default)]
    pub scope: ListScope,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    #[default]
    Active,
    History,
}

/// GET /api/broadcasts?customer_id=&scope=active|history&limit=
pub async fn list_broadcasts(
    State(state): State<ServerState>,
    Query(query): Query<ListBroadcastsQuery>,
) -> Result<Json<Vec<Broadcast>>> {
    let customer_id = parse_record_id(&query.customer_id, "customer")?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let broadcasts = match query.scope {
        ListScope::Active => orchestrator.list_active(&customer_id).await?,
        ListScope::History => {
            orchestrator
                .list_history(&customer_id, query.limit.unwrap_or(20))
                .await?
        }
    };

    Ok(Json(broadcasts))
}

#[derive(Deserialize)]
pub struct CountBroadcastsQuery {
    pub customer_id: String,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /api/broadcasts/count?customer_id=
pub async fn count_active(
    State(state): State<ServerState>,
    Query(query): Query<CountBroadcastsQuery>,
) -> Result<Json<CountResponse>> {
    let customer_id = parse_record_id(&query.customer_id, "customer")?;

    let orchestrator = BroadcastOrchestrator::new(state.get_db());
    let count = orchestrator.count_active(&customer_id).await?;

    Ok(Json(CountResponse { count }))
}
