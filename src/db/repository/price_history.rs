//! Price History Repository
//!
//! Upsert-only cache keyed by (seller, customer, normalized item name). The
//! deterministic record key makes the upsert idempotent without a separate
//! conflict clause.

use super::{BaseRepository, RepoResult};
use crate::db::models::PriceHistoryEntry;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "price_history";

#[derive(Clone)]
pub struct PriceHistoryRepository {
    base: BaseRepository,
}

impl PriceHistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record id derived from the logical key
    fn entry_key(entry: &PriceHistoryEntry) -> RecordId {
        let key = format!(
            "{}:{}:{}",
            entry.seller_id.key(),
            entry.customer_id.key(),
            entry.item_name_normalized
        );
        RecordId::from_table_key(TABLE, key)
    }

    /// Merge a batch of entries, replacing any previous quote for the same
    /// (seller, customer, item name) key
    pub async fn upsert_many(&self, entries: Vec<PriceHistoryEntry>) -> RepoResult<()> {
        for entry in entries {
            let key = Self::entry_key(&entry);
            let _: Option<PriceHistoryEntry> =
                self.base.db().upsert(key).content(entry).await?;
        }
        Ok(())
    }

    /// Most recently updated entries for one (seller, customer) pair, used
    /// to pre-populate a seller's next quote for that customer
    pub async fn recent_for_customer(
        &self,
        seller_id: &RecordId,
        customer_id: &RecordId,
        limit: usize,
    ) -> RepoResult<Vec<PriceHistoryEntry>> {
        let entries: Vec<PriceHistoryEntry> = self
            .base
            .db()
            .query(
                "SELECT * FROM price_history \
                 WHERE seller_id = $seller AND customer_id = $customer \
                 ORDER BY updated_at DESC LIMIT $limit",
            )
            .bind(("seller", seller_id.to_string()))
            .bind(("customer", customer_id.to_string()))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
