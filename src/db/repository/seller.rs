//! Seller Repository
//!
//! Read access for eligibility checks, plus creation for seeding and
//! admin tooling. Sellers are otherwise owned by the onboarding flow.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Seller, SellerCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "seller";

#[derive(Clone)]
pub struct SellerRepository {
    base: BaseRepository,
}

impl SellerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch a batch of sellers by id; missing ids are simply absent
    pub async fn find_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<Seller>> {
        let ids = ids.to_vec();
        let sellers: Vec<Seller> = self
            .base
            .db()
            .query("SELECT * FROM seller WHERE id IN $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(sellers)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Seller>> {
        let seller: Option<Seller> = self.base.db().select(id.clone()).await?;
        Ok(seller)
    }

    pub async fn create(&self, data: SellerCreate) -> RepoResult<Seller> {
        let seller = Seller {
            id: None,
            name: data.name,
            logo_url: data.logo_url,
            rating: data.rating,
            is_active: data.is_active,
            is_approved: data.is_approved,
            supports_custom_orders: data.supports_custom_orders,
            delivery_fee: data.delivery_fee,
            settings: data.settings,
        };

        let created: Option<Seller> = self.base.db().create(TABLE).content(seller).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create seller".to_string()))
    }
}
