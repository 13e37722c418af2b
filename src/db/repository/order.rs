//! Order Repository
//!
//! Creates firm orders and their line items on behalf of the pricing
//! engine, and deletes them again during compensating rollback.

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderDraft, OrderStatus, PricingLineItem};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";
const ITEMS_TABLE: &str = "pricing_line_item";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, draft: OrderDraft) -> RepoResult<Order> {
        let order = Order {
            id: None,
            request_id: draft.request_id,
            seller_id: draft.seller_id,
            customer_id: draft.customer_id,
            status: OrderStatus::AwaitingApproval,
            order_kind: draft.order_kind,
            subtotal: draft.subtotal,
            delivery_fee: draft.delivery_fee,
            total: draft.total,
            created_at: Utc::now(),
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Compensating delete after a failed line-item insert
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let _: Option<Order> = self.base.db().delete(id.clone()).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    pub async fn insert_line_items(
        &self,
        items: Vec<PricingLineItem>,
    ) -> RepoResult<Vec<PricingLineItem>> {
        let created: Vec<PricingLineItem> =
            self.base.db().insert(ITEMS_TABLE).content(items).await?;
        Ok(created)
    }

    pub async fn find_line_items(&self, order_id: &RecordId) -> RepoResult<Vec<PricingLineItem>> {
        let items: Vec<PricingLineItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM pricing_line_item WHERE order_id = $order \
                 ORDER BY display_order ASC",
            )
            .bind(("order", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Total number of orders, used by tests asserting rollback left nothing behind
    pub async fn count_all(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM order GROUP ALL")
            .await?;
        let row: Option<super::CountRow> = result.take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
