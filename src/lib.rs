//! Bazaar Server - custom-order broadcast and pricing backend
//!
//! A customer describes a purchase in free form (text, a voice note, or
//! photos) and broadcasts it to up to three sellers at once. Each seller
//! independently prices their copy of the request; the first submission to
//! claim a request wins it and materializes a firm order.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, state, errors, HTTP server
//! ├── db/            # Embedded SurrealDB, models, repositories
//! ├── services/      # Eligibility, orchestration, pricing engine
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging setup
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use services::{
    BroadcastError, BroadcastOrchestrator, EligibilityValidator, OrderMaterializer, PricingEngine,
};
pub use utils::logger::init_logger_with_file;

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ )____ _____  ____ _____ ______
  / __  / __ `/_  / / __ `/ __ `/ ___/
 / /_/ / /_/ / / /_/ /_/ / /_/ / /
/_____/\__,_/ /___/\__,_/\__,_/_/
    "#
    );
}
