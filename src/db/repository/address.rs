//! Customer Address Repository
//!
//! Read access for the creation-time address snapshot, plus creation for
//! seeding. Address management itself lives outside this core.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::CustomerAddress;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "customer_address";

#[derive(Clone)]
pub struct CustomerAddressRepository {
    base: BaseRepository,
}

impl CustomerAddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<CustomerAddress>> {
        let address: Option<CustomerAddress> = self.base.db().select(id.clone()).await?;
        Ok(address)
    }

    pub async fn create(&self, address: CustomerAddress) -> RepoResult<CustomerAddress> {
        let created: Option<CustomerAddress> =
            self.base.db().create(TABLE).content(address).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }
}
