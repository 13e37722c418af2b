//! Firm order model
//!
//! Materialized when a seller's quote submission wins its claim. After
//! creation the order belongs to the downstream approval flow; the pricing
//! request keeps only a weak reference by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::broadcast::OrderKind;
use super::serde_helpers;

/// Order lifecycle; this core only ever writes `awaiting_approval`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    AwaitingApproval,
    Approved,
    Rejected,
    Cancelled,
}

/// Firm order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub request_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: RecordId,
    pub status: OrderStatus,
    pub order_kind: OrderKind,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

/// Inputs for materializing an order
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub request_id: RecordId,
    pub seller_id: RecordId,
    pub customer_id: RecordId,
    pub order_kind: OrderKind,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}
