//! Pricing Request Repository
//!
//! Holds the compare-and-swap claim that makes concurrent quote submissions
//! safe: a single conditional `UPDATE ... WHERE status = 'pending'` is the
//! only synchronization primitive in the system. An empty result set means
//! another writer won the race.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{PricingRequest, PricingRequestDetail, PricingRequestStatus, Seller};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "pricing_request";

#[derive(Clone)]
pub struct PricingRequestRepository {
    base: BaseRepository,
}

impl PricingRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Bulk insert the fan-out batch. The unique (broadcast_id, seller_id)
    /// index rejects duplicate pairs at the storage layer.
    pub async fn insert_many(
        &self,
        requests: Vec<PricingRequest>,
    ) -> RepoResult<Vec<PricingRequest>> {
        let created: Vec<PricingRequest> =
            self.base.db().insert(TABLE).content(requests).await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<PricingRequest>> {
        let request: Option<PricingRequest> = self.base.db().select(id.clone()).await?;
        Ok(request)
    }

    /// Compare-and-swap claim: `pending` -> `claimed` in one conditional
    /// update. Returns `None` when the stored status was no longer `pending`,
    /// i.e. a concurrent submission claimed the request first.
    pub async fn claim(
        &self,
        id: &RecordId,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<PricingRequest>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $claimed, claimed_at = $now \
                 WHERE status = $pending RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("claimed", PricingRequestStatus::Claimed))
            .bind(("pending", PricingRequestStatus::Pending))
            .bind(("now", now))
            .await?;
        let updated: Vec<PricingRequest> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Rollback compensation: release a claim so a later submission can
    /// retry from scratch
    pub async fn release_claim(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE $id SET status = $pending, claimed_at = NONE \
                 WHERE status = $claimed",
            )
            .bind(("id", id.clone()))
            .bind(("pending", PricingRequestStatus::Pending))
            .bind(("claimed", PricingRequestStatus::Claimed))
            .await?
            .check()?;
        Ok(())
    }

    /// Final write of a successful submission: attach the order and totals
    /// and move `claimed` -> `priced`. Kept separate from the claim so any
    /// observer watching for `priced` only ever sees final totals.
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_priced(
        &self,
        id: &RecordId,
        order_id: &RecordId,
        items_count: i32,
        subtotal: f64,
        delivery_fee: f64,
        total: f64,
        now: DateTime<Utc>,
    ) -> RepoResult<PricingRequest> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $priced, order_id = $order, \
                 items_count = $items_count, subtotal = $subtotal, \
                 delivery_fee = $delivery_fee, total = $total, priced_at = $now \
                 WHERE status = $claimed RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("priced", PricingRequestStatus::Priced))
            .bind(("order", order_id.clone()))
            .bind(("items_count", items_count))
            .bind(("subtotal", subtotal))
            .bind(("delivery_fee", delivery_fee))
            .bind(("total", total))
            .bind(("now", now))
            .bind(("claimed", PricingRequestStatus::Claimed))
            .await?;
        let updated: Vec<PricingRequest> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database(format!("Request {} was not claimed", id)))
    }

    /// Cancel every still-pending request of a broadcast; claimed and priced
    /// requests are deliberately left untouched
    pub async fn cancel_pending_for_broadcast(&self, broadcast_id: &RecordId) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE pricing_request SET status = $cancelled \
                 WHERE broadcast_id = $broadcast AND status = $pending RETURN AFTER",
            )
            .bind(("cancelled", PricingRequestStatus::Cancelled))
            .bind(("broadcast", broadcast_id.to_string()))
            .bind(("pending", PricingRequestStatus::Pending))
            .await?;
        let updated: Vec<PricingRequest> = result.take(0)?;
        Ok(updated.len())
    }

    /// All requests of a broadcast with seller display data joined in,
    /// ordered by creation time. Seller fields are joined in memory since
    /// reference fields are stored in string form.
    pub async fn find_for_broadcast(
        &self,
        broadcast_id: &RecordId,
    ) -> RepoResult<Vec<PricingRequestDetail>> {
        let requests: Vec<PricingRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM pricing_request WHERE broadcast_id = $broadcast \
                 ORDER BY created_at ASC",
            )
            .bind(("broadcast", broadcast_id.to_string()))
            .await?
            .take(0)?;

        let seller_ids: Vec<RecordId> = requests.iter().map(|r| r.seller_id.clone()).collect();
        let sellers: Vec<Seller> = self
            .base
            .db()
            .query("SELECT * FROM seller WHERE id IN $ids")
            .bind(("ids", seller_ids))
            .await?
            .take(0)?;
        let by_id: HashMap<RecordId, &Seller> = sellers
            .iter()
            .filter_map(|s| s.id.clone().map(|id| (id, s)))
            .collect();

        let details = requests
            .into_iter()
            .map(|request| {
                let seller = by_id.get(&request.seller_id);
                PricingRequestDetail {
                    id: request.id,
                    broadcast_id: request.broadcast_id,
                    seller_id: request.seller_id,
                    seller_name: seller.map(|s| s.name.clone()),
                    seller_logo_url: seller.and_then(|s| s.logo_url.clone()),
                    seller_rating: seller.and_then(|s| s.rating),
                    status: request.status,
                    items_count: request.items_count,
                    subtotal: request.subtotal,
                    delivery_fee: request.delivery_fee,
                    total: request.total,
                    pricing_expires_at: request.pricing_expires_at,
                    order_id: request.order_id,
                    priced_at: request.priced_at,
                }
            })
            .collect();
        Ok(details)
    }

    /// A seller's requests, optionally filtered to a status set
    pub async fn list_for_seller(
        &self,
        seller_id: &RecordId,
        statuses: Option<Vec<PricingRequestStatus>>,
    ) -> RepoResult<Vec<PricingRequest>> {
        let requests: Vec<PricingRequest> = match statuses {
            Some(statuses) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM pricing_request \
                         WHERE seller_id = $seller AND status IN $statuses \
                         ORDER BY created_at ASC",
                    )
                    .bind(("seller", seller_id.to_string()))
                    .bind(("statuses", statuses))
                    .await?
                    .take(0)?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM pricing_request WHERE seller_id = $seller \
                         ORDER BY created_at ASC",
                    )
                    .bind(("seller", seller_id.to_string()))
                    .await?
                    .take(0)?
            }
        };
        Ok(requests)
    }

    pub async fn count_pending(&self, seller_id: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM pricing_request \
                 WHERE seller_id = $seller AND status = $pending GROUP ALL",
            )
            .bind(("seller", seller_id.to_string()))
            .bind(("pending", PricingRequestStatus::Pending))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
