//! Database Module
//!
//! Embedded SurrealDB storage: connection setup plus schema/index definition.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use repository::{RepoError, RepoResult};

const NAMESPACE: &str = "bazaar";
const DATABASE: &str = "broadcast";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &Path) -> RepoResult<Self> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;

        define_schema(&db).await?;
        tracing::info!("Database ready at {}", db_path.display());

        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn memory() -> RepoResult<Self> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| RepoError::Database(format!("Failed to open in-memory database: {e}")))?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Declare indexes the state machine relies on.
///
/// The unique index on (broadcast_id, seller_id) enforces at most one
/// pricing request per seller per broadcast at the storage layer.
async fn define_schema(db: &Surreal<Db>) -> RepoResult<()> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS uniq_broadcast_seller
            ON TABLE pricing_request COLUMNS broadcast_id, seller_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_request_seller_status
            ON TABLE pricing_request COLUMNS seller_id, status;
        DEFINE INDEX IF NOT EXISTS idx_broadcast_customer_status
            ON TABLE broadcast COLUMNS customer_id, status;
        "#,
    )
    .await?
    .check()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_an_on_disk_store() {
        let tmp = tempfile::tempdir().unwrap();
        let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();

        service
            .db
            .query("CREATE broadcast:probe SET status = 'active'")
            .await
            .unwrap()
            .check()
            .unwrap();
        let mut res = service
            .db
            .query("SELECT count() AS count FROM broadcast GROUP ALL")
            .await
            .unwrap();
        let row: Option<repository::CountRow> = res.take(0).unwrap();
        assert_eq!(row.unwrap().count, 1);
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_request_pairs() {
        let service = DbService::memory().await.unwrap();
        let create = "CREATE pricing_request SET broadcast_id = 'broadcast:a', \
                      seller_id = 'seller:s', status = 'pending'";

        service.db.query(create).await.unwrap().check().unwrap();
        let duplicate = service.db.query(create).await.unwrap().check();
        assert!(duplicate.is_err());
    }
}
