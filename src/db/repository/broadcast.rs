//! Broadcast Repository
//!
//! The broadcast row is written only by the orchestrator: creation, the
//! compensating delete when fan-out fails, and cancellation.

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{Broadcast, BroadcastStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "broadcast";

#[derive(Clone)]
pub struct BroadcastRepository {
    base: BaseRepository,
}

impl BroadcastRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, broadcast: Broadcast) -> RepoResult<Broadcast> {
        let created: Option<Broadcast> = self.base.db().create(TABLE).content(broadcast).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create broadcast".to_string()))
    }

    /// Compensating delete, used when request fan-out fails after the
    /// broadcast row was persisted
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        let _: Option<Broadcast> = self.base.db().delete(id.clone()).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Broadcast>> {
        let broadcast: Option<Broadcast> = self.base.db().select(id.clone()).await?;
        Ok(broadcast)
    }

    /// Flip an active broadcast to cancelled; returns the updated row if the
    /// broadcast was still active
    pub async fn set_cancelled(&self, id: &RecordId) -> RepoResult<Option<Broadcast>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $cancelled WHERE status = $active RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("cancelled", BroadcastStatus::Cancelled))
            .bind(("active", BroadcastStatus::Active))
            .await?;
        let updated: Vec<Broadcast> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    pub async fn list_active(&self, customer_id: &RecordId) -> RepoResult<Vec<Broadcast>> {
        let broadcasts: Vec<Broadcast> = self
            .base
            .db()
            .query(
                "SELECT * FROM broadcast WHERE customer_id = $customer AND status = $active \
                 ORDER BY created_at DESC",
            )
            .bind(("customer", customer_id.to_string()))
            .bind(("active", BroadcastStatus::Active))
            .await?
            .take(0)?;
        Ok(broadcasts)
    }

    /// The customer's broadcasts regardless of status, newest first. Active
    /// broadcasts appear here too; `list_active` is the filtered view.
    pub async fn list_history(
        &self,
        customer_id: &RecordId,
        limit: usize,
    ) -> RepoResult<Vec<Broadcast>> {
        let broadcasts: Vec<Broadcast> = self
            .base
            .db()
            .query(
                "SELECT * FROM broadcast WHERE customer_id = $customer \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("customer", customer_id.to_string()))
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(broadcasts)
    }

    pub async fn count_active(&self, customer_id: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM broadcast \
                 WHERE customer_id = $customer AND status = $active GROUP ALL",
            )
            .bind(("customer", customer_id.to_string()))
            .bind(("active", BroadcastStatus::Active))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
