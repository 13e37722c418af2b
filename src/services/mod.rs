//! Service layer
//!
//! - [`EligibilityValidator`] - batch seller eligibility checks (pure read)
//! - [`BroadcastOrchestrator`] - broadcast creation, fan-out, cancellation
//!   and the read/query surface
//! - [`PricingEngine`] - the claim/price/materialize state machine
//! - [`OrderMaterializer`] - seam for firm-order creation

pub mod broadcast;
pub mod eligibility;
pub mod error;
pub mod materializer;
pub mod money;
pub mod pricing;

pub use broadcast::{BroadcastOrchestrator, BroadcastWithRequests, NewBroadcast};
pub use eligibility::{EligibilityValidator, ValidatedSeller};
pub use error::BroadcastError;
pub use materializer::{OrderMaterializer, SurrealOrderMaterializer};
pub use pricing::{PricingEngine, PricingOutcome};
