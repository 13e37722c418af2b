//! Pricing request model
//!
//! One seller's independent view of a broadcast; exactly one per
//! (broadcast, seller) pair, enforced by a unique index. The status field is
//! the core state machine:
//!
//! ```text
//! pending ──► claimed ──► priced
//!    │            │
//!    │            └──► pending      (rollback after a partial failure)
//!    ├──► cancelled                 (broadcast cancelled)
//!    └──► expired                   (external sweep; also from claimed)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::broadcast::RequestPayload;
use super::serde_helpers;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingRequestStatus {
    Pending,
    Claimed,
    Priced,
    Cancelled,
    Expired,
}

impl std::str::FromStr for PricingRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "claimed" => Ok(Self::Claimed),
            "priced" => Ok(Self::Priced),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// Pricing request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub broadcast_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller_id: RecordId,
    /// Immutable copy of the broadcast payload, so a seller view needs no join
    pub payload: RequestPayload,
    pub customer_notes: Option<String>,
    pub status: PricingRequestStatus,
    /// Count of non-unavailable items; zero until priced
    pub items_count: i32,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    /// Copy of the broadcast's pricing deadline, fixed at creation
    pub pricing_expires_at: DateTime<Utc>,
    /// Set exactly once when the request reaches `priced`
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order_id: Option<RecordId>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub priced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Pricing request joined with seller display data (quote comparison view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequestDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub broadcast_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller_id: RecordId,
    pub seller_name: Option<String>,
    pub seller_logo_url: Option<String>,
    pub seller_rating: Option<f64>,
    pub status: PricingRequestStatus,
    pub items_count: i32,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub pricing_expires_at: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order_id: Option<RecordId>,
    pub priced_at: Option<DateTime<Utc>>,
}
