//! Database models
//!
//! One module per table, plus shared serde helpers for SurrealDB record ids.

pub mod address;
pub mod broadcast;
pub mod line_item;
pub mod order;
pub mod price_history;
pub mod pricing_request;
pub mod seller;
pub mod serde_helpers;

pub use address::{AddressSnapshot, CustomerAddress};
pub use broadcast::{
    Broadcast, BroadcastStatus, InputKind, MAX_BROADCAST_SELLERS, OrderKind, RequestPayload,
};
pub use line_item::{Availability, LineItemInput, PricingLineItem};
pub use order::{Order, OrderDraft, OrderStatus};
pub use price_history::{PriceHistoryEntry, normalize_item_name};
pub use pricing_request::{PricingRequest, PricingRequestDetail, PricingRequestStatus};
pub use seller::{Seller, SellerCreate, SellerSettings};
