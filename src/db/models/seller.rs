//! Seller model
//!
//! Sellers are managed by an external onboarding flow; this core only reads
//! them for eligibility checks and display data.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Per-seller custom-order settings, all optional with platform defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SellerSettings {
    /// How long this seller is willing to spend pricing a request
    pub pricing_timeout_hours: i64,
    /// How long an unanswered broadcast may stay alive for this seller
    pub auto_cancel_after_hours: i64,
}

impl Default for SellerSettings {
    fn default() -> Self {
        Self {
            pricing_timeout_hours: 24,
            auto_cancel_after_hours: 48,
        }
    }
}

/// Seller entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub logo_url: Option<String>,
    pub rating: Option<f64>,
    pub is_active: bool,
    pub is_approved: bool,
    /// Whether the seller accepts unstructured (non-catalog) orders
    pub supports_custom_orders: bool,
    pub delivery_fee: f64,
    pub settings: Option<SellerSettings>,
}

impl Seller {
    /// Settings with defaults applied
    pub fn effective_settings(&self) -> SellerSettings {
        self.settings.clone().unwrap_or_default()
    }
}

/// Create payload (test seeding and admin tooling)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerCreate {
    pub name: String,
    pub logo_url: Option<String>,
    pub rating: Option<f64>,
    pub is_active: bool,
    pub is_approved: bool,
    pub supports_custom_orders: bool,
    pub delivery_fee: f64,
    pub settings: Option<SellerSettings>,
}
