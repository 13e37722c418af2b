//! Broadcast Orchestrator
//!
//! Creates the broadcast aggregate and fans it out into one pricing request
//! per eligible seller, owns cancellation, and serves the customer- and
//! seller-facing read surface.

use chrono::{Duration, Utc};
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    Broadcast, BroadcastStatus, InputKind, OrderKind, PricingRequest, PricingRequestDetail,
    PricingRequestStatus, RequestPayload,
};
use crate::db::repository::{
    BroadcastRepository, CustomerAddressRepository, PricingRequestRepository,
};
use crate::services::eligibility::{EligibilityValidator, ValidatedSeller};
use crate::services::error::BroadcastError;

/// Inputs for creating a broadcast
#[derive(Debug, Clone)]
pub struct NewBroadcast {
    pub customer_id: RecordId,
    pub input_kind: InputKind,
    pub text: Option<String>,
    pub voice_reference: Option<String>,
    pub image_references: Option<Vec<String>>,
    pub notes: Option<String>,
    pub seller_ids: Vec<RecordId>,
    pub delivery_address_id: Option<RecordId>,
    pub order_kind: OrderKind,
}

/// Quote comparison view: the broadcast plus all of its requests with
/// seller display data
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastWithRequests {
    pub broadcast: Broadcast,
    pub requests: Vec<PricingRequestDetail>,
}

#[derive(Clone)]
pub struct BroadcastOrchestrator {
    broadcasts: BroadcastRepository,
    requests: PricingRequestRepository,
    addresses: CustomerAddressRepository,
    eligibility: EligibilityValidator,
}

impl BroadcastOrchestrator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            broadcasts: BroadcastRepository::new(db.clone()),
            requests: PricingRequestRepository::new(db.clone()),
            addresses: CustomerAddressRepository::new(db.clone()),
            eligibility: EligibilityValidator::new(db),
        }
    }

    /// Create a broadcast and fan it out into one pending request per
    /// validated seller.
    ///
    /// The pricing window is bounded by the most impatient seller; the
    /// auto-cancel window by the most patient one. If the request batch
    /// fails to persist after the broadcast row was written, the broadcast
    /// is compensating-deleted so no orphan aggregate survives.
    pub async fn create(
        &self,
        input: NewBroadcast,
    ) -> Result<(Broadcast, Vec<PricingRequest>), BroadcastError> {
        let payload = RequestPayload::from_parts(
            input.input_kind,
            input.text,
            input.voice_reference,
            input.image_references,
        )
        .ok_or(BroadcastError::EmptyPayload)?;

        let sellers = self.eligibility.validate(&input.seller_ids).await?;

        let delivery_address = match &input.delivery_address_id {
            Some(address_id) => {
                let address = self.addresses.find_by_id(address_id).await?;
                if address.is_none() {
                    tracing::warn!(address = %address_id, "Delivery address not found, broadcasting without snapshot");
                }
                address.map(|a| a.to_snapshot())
            }
            None => None,
        };

        let now = Utc::now();
        let pricing_timeout = sellers
            .iter()
            .map(|s| s.pricing_timeout_hours)
            .min()
            .unwrap_or(24);
        let auto_cancel = sellers
            .iter()
            .map(|s| s.auto_cancel_after_hours)
            .max()
            .unwrap_or(48);

        let pricing_deadline = now + Duration::hours(pricing_timeout);
        let auto_cancel_deadline = now + Duration::hours(auto_cancel);

        let broadcast = Broadcast {
            id: None,
            customer_id: input.customer_id,
            payload: payload.clone(),
            customer_notes: input.notes.clone(),
            seller_ids: input.seller_ids.clone(),
            delivery_address,
            order_kind: input.order_kind,
            status: BroadcastStatus::Active,
            pricing_deadline,
            auto_cancel_deadline,
            created_at: now,
        };

        let broadcast = self.broadcasts.create(broadcast).await?;
        let broadcast_id = broadcast
            .id
            .clone()
            .ok_or_else(|| BroadcastError::Repo(crate::db::repository::RepoError::Database(
                "created broadcast has no id".into(),
            )))?;

        let batch = fan_out(&broadcast_id, &broadcast, &payload, &sellers);

        match self.requests.insert_many(batch).await {
            Ok(requests) => {
                tracing::info!(
                    broadcast = %broadcast_id,
                    sellers = requests.len(),
                    "Broadcast created"
                );
                Ok((broadcast, requests))
            }
            Err(e) => {
                // Compensating rollback: never leave a broadcast with no requests
                if let Err(del) = self.broadcasts.delete(&broadcast_id).await {
                    tracing::error!(
                        broadcast = %broadcast_id,
                        error = %del,
                        "Failed to roll back broadcast after fan-out failure"
                    );
                }
                Err(BroadcastError::FanOut(e))
            }
        }
    }

    /// Cancel an active broadcast.
    ///
    /// Only the owning customer may cancel. Pending requests are cancelled
    /// along with the broadcast; claimed and priced requests are left
    /// untouched since a seller's in-flight or completed quote cannot be
    /// retracted from here.
    pub async fn cancel(
        &self,
        broadcast_id: &RecordId,
        customer_id: &RecordId,
    ) -> Result<(), BroadcastError> {
        let broadcast = self
            .broadcasts
            .find_by_id(broadcast_id)
            .await?
            .ok_or(BroadcastError::NotFound)?;

        if &broadcast.customer_id != customer_id {
            return Err(BroadcastError::Unauthorized);
        }
        if broadcast.status != BroadcastStatus::Active {
            return Err(BroadcastError::NotActive);
        }

        if self.broadcasts.set_cancelled(broadcast_id).await?.is_none() {
            // Lost a race with the sweep or another cancel
            return Err(BroadcastError::NotActive);
        }

        let cancelled = self
            .requests
            .cancel_pending_for_broadcast(broadcast_id)
            .await?;
        tracing::info!(
            broadcast = %broadcast_id,
            requests_cancelled = cancelled,
            "Broadcast cancelled"
        );

        Ok(())
    }

    /// Broadcast with all requests and seller display data; customer-only
    pub async fn get_with_requests(
        &self,
        broadcast_id: &RecordId,
        requester_id: &RecordId,
    ) -> Result<BroadcastWithRequests, BroadcastError> {
        let broadcast = self
            .broadcasts
            .find_by_id(broadcast_id)
            .await?
            .ok_or(BroadcastError::NotFound)?;

        if &broadcast.customer_id != requester_id {
            return Err(BroadcastError::Unauthorized);
        }

        let requests = self.requests.find_for_broadcast(broadcast_id).await?;
        Ok(BroadcastWithRequests {
            broadcast,
            requests,
        })
    }

    pub async fn list_active(
        &self,
        customer_id: &RecordId,
    ) -> Result<Vec<Broadcast>, BroadcastError> {
        Ok(self.broadcasts.list_active(customer_id).await?)
    }

    pub async fn list_history(
        &self,
        customer_id: &RecordId,
        limit: usize,
    ) -> Result<Vec<Broadcast>, BroadcastError> {
        Ok(self.broadcasts.list_history(customer_id, limit).await?)
    }

    pub async fn count_active(&self, customer_id: &RecordId) -> Result<i64, BroadcastError> {
        Ok(self.broadcasts.count_active(customer_id).await?)
    }

    /// A seller's requests, optionally filtered by status
    pub async fn list_seller_requests(
        &self,
        seller_id: &RecordId,
        statuses: Option<Vec<PricingRequestStatus>>,
    ) -> Result<Vec<PricingRequest>, BroadcastError> {
        Ok(self.requests.list_for_seller(seller_id, statuses).await?)
    }

    pub async fn count_pending(&self, seller_id: &RecordId) -> Result<i64, BroadcastError> {
        Ok(self.requests.count_pending(seller_id).await?)
    }
}

/// Build the fan-out batch: one pending request per validated seller, each
/// carrying its own copy of the payload and the shared pricing deadline
fn fan_out(
    broadcast_id: &RecordId,
    broadcast: &Broadcast,
    payload: &RequestPayload,
    sellers: &[ValidatedSeller],
) -> Vec<PricingRequest> {
    sellers
        .iter()
        .map(|seller| PricingRequest {
            id: None,
            broadcast_id: broadcast_id.clone(),
            seller_id: seller.id.clone(),
            payload: payload.clone(),
            customer_notes: broadcast.customer_notes.clone(),
            status: PricingRequestStatus::Pending,
            items_count: 0,
            subtotal: 0.0,
            delivery_fee: seller.delivery_fee,
            total: 0.0,
            pricing_expires_at: broadcast.pricing_deadline,
            order_id: None,
            claimed_at: None,
            priced_at: None,
            created_at: broadcast.created_at,
        })
        .collect()
}
