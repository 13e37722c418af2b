//! Price history model
//!
//! Append/merge-only cache of previously quoted item names per
//! (seller, customer) pair. Used to pre-populate future quotes; never part
//! of the core state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Last-known quote for one item name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub seller_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: RecordId,
    pub item_name_normalized: String,
    pub item_name: String,
    pub unit_kind: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub request_id: RecordId,
    pub updated_at: DateTime<Utc>,
}

/// Normalization used for the upsert key: trimmed, lowercased
pub fn normalize_item_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_item_name("  Basmati Rice "), "basmati rice");
        assert_eq!(normalize_item_name("أرز"), "أرز");
    }
}
