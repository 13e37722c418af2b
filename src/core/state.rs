use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;

/// Shared application state
///
/// Holds the configuration and a handle to the embedded database. Cloning is
/// cheap; the database handle is internally reference-counted.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// Initialize server state: working directory plus database.
    ///
    /// # Panics
    ///
    /// Panics when the working directory cannot be created or the database
    /// fails to open. Both are unrecoverable at startup.
    pub async fn initialize(config: &Config) -> Self {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).expect("Failed to create database directory");

        let db_path = db_dir.join("bazaar.db");
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db_service.db)
    }

    /// In-memory state for tests
    pub async fn in_memory(config: Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::new(config, db_service.db)
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
