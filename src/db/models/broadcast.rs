//! Broadcast model
//!
//! One customer-initiated request, fanned out to up to three sellers. The
//! payload and delivery address are captured by value at creation time;
//! sellers only ever see this immutable copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::address::AddressSnapshot;
use super::serde_helpers;

/// Upper bound on the fan-out size of a single broadcast
pub const MAX_BROADCAST_SELLERS: usize = 3;

/// Broadcast lifecycle status
///
/// `completed` is written by the downstream approval flow, `expired` by the
/// external deadline sweep; this core only writes `active` and `cancelled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Active,
    Completed,
    Cancelled,
    Expired,
}

/// Delivery mode chosen by the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Delivery,
    Pickup,
}

/// Declared kind of the raw customer input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Voice,
    Image,
    Mixed,
}

/// The customer's free-form request content.
///
/// A tagged variant instead of a bag of optional fields, so each kind
/// carries exactly the content it requires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestPayload {
    Text {
        text: String,
    },
    Voice {
        voice_reference: String,
    },
    Image {
        image_references: Vec<String>,
    },
    Mixed {
        text: Option<String>,
        voice_reference: Option<String>,
        image_references: Vec<String>,
    },
}

impl RequestPayload {
    /// Assemble a payload from loose API fields.
    ///
    /// Returns `None` when the declared kind has no usable content (the
    /// empty-payload case the orchestrator rejects).
    pub fn from_parts(
        kind: InputKind,
        text: Option<String>,
        voice_reference: Option<String>,
        image_references: Option<Vec<String>>,
    ) -> Option<Self> {
        let text = text.filter(|t| !t.trim().is_empty());
        let voice_reference = voice_reference.filter(|v| !v.trim().is_empty());
        let image_references: Vec<String> = image_references
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect();

        match kind {
            InputKind::Text => text.map(|text| Self::Text { text }),
            InputKind::Voice => voice_reference.map(|voice_reference| Self::Voice {
                voice_reference,
            }),
            InputKind::Image => {
                (!image_references.is_empty()).then_some(Self::Image { image_references })
            }
            InputKind::Mixed => {
                if text.is_none() && voice_reference.is_none() && image_references.is_empty() {
                    None
                } else {
                    Some(Self::Mixed {
                        text,
                        voice_reference,
                        image_references,
                    })
                }
            }
        }
    }
}

/// Broadcast entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broadcast {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: RecordId,
    pub payload: RequestPayload,
    pub customer_notes: Option<String>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub seller_ids: Vec<RecordId>,
    /// Address copied at creation time, never a live reference
    pub delivery_address: Option<AddressSnapshot>,
    pub order_kind: OrderKind,
    pub status: BroadcastStatus,
    /// Window for sellers to submit a quote (min of the sellers' timeouts)
    pub pricing_deadline: DateTime<Utc>,
    /// When the external sweep may give up entirely (max of the sellers' limits)
    pub auto_cancel_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
