//! Pricing line item model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Seller-reported availability of a quoted item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
    Substituted,
}

/// One line of a seller's quote, as submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub name: String,
    pub unit_kind: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
    pub availability: Availability,
    /// Price of the proposed substitute; required when `substituted`
    pub substitute_total: Option<f64>,
}

/// Persisted line item, tagged with its materialized order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingLineItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub request_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    pub name: String,
    pub unit_kind: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
    pub availability: Availability,
    pub substitute_total: Option<f64>,
    pub display_order: i32,
}
