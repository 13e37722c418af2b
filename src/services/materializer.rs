//! Order Materializer seam
//!
//! The pricing engine drives order creation through this trait so the
//! storage-backed implementation can be swapped for failing doubles when
//! testing the rollback paths.

use async_trait::async_trait;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Order, OrderDraft, PricingLineItem};
use crate::db::repository::{OrderRepository, RepoResult};

#[async_trait]
pub trait OrderMaterializer: Send + Sync {
    /// Create the firm order record
    async fn create_order(&self, draft: OrderDraft) -> RepoResult<Order>;

    /// Insert the quote's line items, already tagged with the order id
    async fn insert_line_items(&self, items: Vec<PricingLineItem>) -> RepoResult<()>;

    /// Compensating delete of a partially materialized order
    async fn delete_order(&self, order_id: &RecordId) -> RepoResult<()>;
}

/// Production implementation backed by the order repository
#[derive(Clone)]
pub struct SurrealOrderMaterializer {
    orders: OrderRepository,
}

impl SurrealOrderMaterializer {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db),
        }
    }
}

#[async_trait]
impl OrderMaterializer for SurrealOrderMaterializer {
    async fn create_order(&self, draft: OrderDraft) -> RepoResult<Order> {
        self.orders.create(draft).await
    }

    async fn insert_line_items(&self, items: Vec<PricingLineItem>) -> RepoResult<()> {
        self.orders.insert_line_items(items).await?;
        Ok(())
    }

    async fn delete_order(&self, order_id: &RecordId) -> RepoResult<()> {
        self.orders.delete(order_id).await
    }
}
