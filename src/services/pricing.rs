//! Pricing Engine
//!
//! The concurrency-critical path: a seller submits a quote for one pricing
//! request, the engine claims the request with a compare-and-swap, computes
//! totals, materializes the firm order and finalizes the request. Partial
//! failures roll the request back to `pending` so a retry starts from
//! scratch; no caller ever has to clean up state manually.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    Availability, LineItemInput, OrderDraft, OrderKind, PriceHistoryEntry, PricingLineItem,
    PricingRequestStatus, normalize_item_name,
};
use crate::db::repository::{
    BroadcastRepository, PriceHistoryRepository, PricingRequestRepository,
};
use crate::services::error::BroadcastError;
use crate::services::materializer::{OrderMaterializer, SurrealOrderMaterializer};
use crate::services::money;

/// Result of a successful quote submission
#[derive(Debug, Clone, Serialize)]
pub struct PricingOutcome {
    #[serde(with = "crate::db::models::serde_helpers::record_id")]
    pub order_id: RecordId,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

#[derive(Clone)]
pub struct PricingEngine {
    requests: PricingRequestRepository,
    broadcasts: BroadcastRepository,
    history: PriceHistoryRepository,
    materializer: Arc<dyn OrderMaterializer>,
}

impl PricingEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        let materializer = Arc::new(SurrealOrderMaterializer::new(db.clone()));
        Self::with_materializer(db, materializer)
    }

    /// Engine with a custom materializer (rollback-path tests)
    pub fn with_materializer(db: Surreal<Db>, materializer: Arc<dyn OrderMaterializer>) -> Self {
        Self {
            requests: PricingRequestRepository::new(db.clone()),
            broadcasts: BroadcastRepository::new(db.clone()),
            history: PriceHistoryRepository::new(db),
            materializer,
        }
    }

    /// Submit a seller's quote for one pricing request.
    ///
    /// At most one submission can ever proceed past the claim; every loser
    /// observes [`BroadcastError::ClaimLost`] or
    /// [`BroadcastError::AlreadyClaimedOrPriced`] and sees no partial state.
    pub async fn submit(
        &self,
        request_id: &RecordId,
        seller_id: &RecordId,
        items: Vec<LineItemInput>,
        delivery_fee: f64,
    ) -> Result<PricingOutcome, BroadcastError> {
        money::validate_line_items(&items, delivery_fee)?;

        // Fresh read; the seller's form may be arbitrarily stale
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(BroadcastError::NotFound)?;

        if &request.seller_id != seller_id {
            return Err(BroadcastError::Unauthorized);
        }
        if request.status != PricingRequestStatus::Pending {
            return Err(BroadcastError::AlreadyClaimedOrPriced);
        }

        let now = Utc::now();
        if request.pricing_expires_at <= now {
            return Err(BroadcastError::DeadlineExpired);
        }

        let broadcast = self
            .broadcasts
            .find_by_id(&request.broadcast_id)
            .await?
            .ok_or(BroadcastError::NotFound)?;

        // The claim: one conditional update, no read-then-write pair. An
        // empty result means a concurrent submission got there first.
        if self.requests.claim(request_id, now).await?.is_none() {
            return Err(BroadcastError::ClaimLost);
        }

        let totals = money::quote_totals(&items, delivery_fee);

        // Broadcast orders default to pickup; the customer picks the
        // delivery mode later, during quote approval
        let draft = OrderDraft {
            request_id: request_id.clone(),
            seller_id: seller_id.clone(),
            customer_id: broadcast.customer_id.clone(),
            order_kind: OrderKind::Pickup,
            subtotal: totals.subtotal,
            delivery_fee,
            total: totals.total,
        };

        let order = match self.materializer.create_order(draft).await {
            Ok(order) => order,
            Err(e) => {
                self.rollback_claim(request_id).await;
                return Err(BroadcastError::OrderMaterialization(e));
            }
        };
        let order_id = match &order.id {
            Some(id) => id.clone(),
            None => {
                self.rollback_claim(request_id).await;
                return Err(BroadcastError::OrderMaterialization(
                    crate::db::repository::RepoError::Database(
                        "materialized order has no id".into(),
                    ),
                ));
            }
        };

        let line_items = build_line_items(request_id, &order_id, &items, &totals.line_totals);
        if let Err(e) = self.materializer.insert_line_items(line_items).await {
            self.rollback_order(request_id, &order_id).await;
            return Err(BroadcastError::LineItemInsert(e));
        }

        let priced = self
            .requests
            .mark_priced(
                request_id,
                &order_id,
                totals.items_count,
                totals.subtotal,
                delivery_fee,
                totals.total,
                Utc::now(),
            )
            .await;
        if let Err(e) = priced {
            self.rollback_order(request_id, &order_id).await;
            return Err(BroadcastError::Repo(e));
        }

        tracing::info!(
            request = %request_id,
            order = %order_id,
            total = totals.total,
            "Quote submitted"
        );

        // Best-effort: the history cache never fails a submission
        let entries = history_entries(
            seller_id,
            &broadcast.customer_id,
            request_id,
            &order_id,
            &items,
            &totals,
        );
        if let Err(e) = self.history.upsert_many(entries).await {
            tracing::warn!(request = %request_id, error = %e, "Price history update failed");
        }

        Ok(PricingOutcome {
            order_id,
            subtotal: totals.subtotal,
            delivery_fee,
            total: totals.total,
        })
    }

    /// Revert `claimed` -> `pending` so the request can be retried
    async fn rollback_claim(&self, request_id: &RecordId) {
        if let Err(e) = self.requests.release_claim(request_id).await {
            tracing::error!(
                request = %request_id,
                error = %e,
                "Failed to release claim during rollback"
            );
        }
    }

    /// Delete a partially materialized order, then release the claim
    async fn rollback_order(&self, request_id: &RecordId, order_id: &RecordId) {
        if let Err(e) = self.materializer.delete_order(order_id).await {
            tracing::error!(
                order = %order_id,
                error = %e,
                "Failed to delete order during rollback"
            );
        }
        self.rollback_claim(request_id).await;
    }
}

fn build_line_items(
    request_id: &RecordId,
    order_id: &RecordId,
    items: &[LineItemInput],
    line_totals: &[f64],
) -> Vec<PricingLineItem> {
    items
        .iter()
        .zip(line_totals)
        .enumerate()
        .map(|(idx, (item, line_total))| PricingLineItem {
            id: None,
            request_id: request_id.clone(),
            order_id: order_id.clone(),
            name: item.name.clone(),
            unit_kind: item.unit_kind.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: *line_total,
            availability: item.availability,
            substitute_total: item.substitute_total,
            display_order: idx as i32,
        })
        .collect()
}

/// History entries for quotable lines (available and substituted items)
fn history_entries(
    seller_id: &RecordId,
    customer_id: &RecordId,
    request_id: &RecordId,
    order_id: &RecordId,
    items: &[LineItemInput],
    totals: &money::QuoteTotals,
) -> Vec<PriceHistoryEntry> {
    let now = Utc::now();
    items
        .iter()
        .zip(&totals.line_totals)
        .filter(|(item, _)| item.availability != Availability::Unavailable)
        .map(|(item, line_total)| PriceHistoryEntry {
            id: None,
            seller_id: seller_id.clone(),
            customer_id: customer_id.clone(),
            item_name_normalized: normalize_item_name(&item.name),
            item_name: item.name.clone(),
            unit_kind: item.unit_kind.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: *line_total,
            order_id: order_id.clone(),
            request_id: request_id.clone(),
            updated_at: now,
        })
        .collect()
}
