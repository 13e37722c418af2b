//! Eligibility Validator
//!
//! Batch validation of the sellers a broadcast targets. Pure read: safe to
//! retry, no side effects. Any ineligible seller fails the whole batch.

use std::collections::HashSet;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::MAX_BROADCAST_SELLERS;
use crate::db::repository::SellerRepository;
use crate::services::BroadcastError;

/// A seller that passed eligibility, with its settings resolved to
/// effective values
#[derive(Debug, Clone)]
pub struct ValidatedSeller {
    pub id: RecordId,
    pub name: String,
    pub pricing_timeout_hours: i64,
    pub auto_cancel_after_hours: i64,
    pub delivery_fee: f64,
}

#[derive(Clone)]
pub struct EligibilityValidator {
    sellers: SellerRepository,
}

impl EligibilityValidator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            sellers: SellerRepository::new(db),
        }
    }

    /// Validate a batch of seller ids, returning their configs in input order
    pub async fn validate(
        &self,
        seller_ids: &[RecordId],
    ) -> Result<Vec<ValidatedSeller>, BroadcastError> {
        if seller_ids.is_empty() {
            return Err(BroadcastError::NoSellersProvided);
        }
        if seller_ids.len() > MAX_BROADCAST_SELLERS {
            return Err(BroadcastError::TooManySellers);
        }

        let mut seen = HashSet::new();
        if !seller_ids.iter().all(|id| seen.insert(id)) {
            return Err(BroadcastError::DuplicateSeller);
        }

        let found = self.sellers.find_by_ids(seller_ids).await?;

        let mut validated = Vec::with_capacity(seller_ids.len());
        for id in seller_ids {
            let seller = found
                .iter()
                .find(|s| s.id.as_ref() == Some(id))
                .ok_or_else(|| BroadcastError::SellerNotFound(id.to_string()))?;

            if !seller.is_approved {
                return Err(BroadcastError::SellerNotFound(id.to_string()));
            }
            if !seller.is_active {
                return Err(BroadcastError::SellerInactive(seller.name.clone()));
            }
            if !seller.supports_custom_orders {
                return Err(BroadcastError::SellerNotCapable(seller.name.clone()));
            }

            let settings = seller.effective_settings();
            validated.push(ValidatedSeller {
                id: id.clone(),
                name: seller.name.clone(),
                pricing_timeout_hours: settings.pricing_timeout_hours,
                auto_cancel_after_hours: settings.auto_cancel_after_hours,
                delivery_fee: seller.delivery_fee,
            });
        }

        Ok(validated)
    }
}
