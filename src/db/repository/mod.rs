//! Repository Module
//!
//! Per-table access to the embedded SurrealDB store. Each repository wraps a
//! [`BaseRepository`] holding the shared database handle.

pub mod address;
pub mod broadcast;
pub mod order;
pub mod price_history;
pub mod pricing_request;
pub mod seller;

pub use address::CustomerAddressRepository;
pub use broadcast::BroadcastRepository;
pub use order::OrderRepository;
pub use price_history::PriceHistoryRepository;
pub use pricing_request::PricingRequestRepository;
pub use seller::SellerRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Row shape for `SELECT count() ... GROUP ALL` queries
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}
