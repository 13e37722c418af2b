//! Domain error type shared by the broadcast and pricing services

use thiserror::Error;

use crate::db::models::MAX_BROADCAST_SELLERS;
use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("at least one seller is required")]
    NoSellersProvided,

    #[error("a broadcast can target at most {MAX_BROADCAST_SELLERS} sellers")]
    TooManySellers,

    #[error("the same seller was selected more than once")]
    DuplicateSeller,

    #[error("seller not found or not approved: {0}")]
    SellerNotFound(String),

    #[error("seller is not active: {0}")]
    SellerInactive(String),

    #[error("seller does not accept custom orders: {0}")]
    SellerNotCapable(String),

    #[error("a broadcast needs text, a voice note, or images")]
    EmptyPayload,

    #[error("invalid line items: {0}")]
    InvalidLineItems(String),

    #[error("broadcast not found")]
    NotFound,

    #[error("requester does not own this resource")]
    Unauthorized,

    #[error("broadcast is no longer active")]
    NotActive,

    #[error("request fan-out failed")]
    FanOut(#[source] RepoError),

    #[error("request was already claimed or priced")]
    AlreadyClaimedOrPriced,

    #[error("the pricing deadline has passed")]
    DeadlineExpired,

    #[error("another submission claimed this request first")]
    ClaimLost,

    #[error("order materialization failed")]
    OrderMaterialization(#[source] RepoError),

    #[error("line item insert failed")]
    LineItemInsert(#[source] RepoError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl BroadcastError {
    /// Stable machine-readable code surfaced to API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSellersProvided => "no_sellers_provided",
            Self::TooManySellers => "too_many_sellers",
            Self::DuplicateSeller => "duplicate_seller",
            Self::SellerNotFound(_) => "seller_not_found",
            Self::SellerInactive(_) => "seller_inactive",
            Self::SellerNotCapable(_) => "seller_not_capable",
            Self::EmptyPayload => "empty_payload",
            Self::InvalidLineItems(_) => "invalid_line_items",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::NotActive => "not_active",
            Self::FanOut(_) => "fan_out_failure",
            Self::AlreadyClaimedOrPriced => "already_claimed_or_priced",
            Self::DeadlineExpired => "deadline_expired",
            Self::ClaimLost => "claim_lost",
            Self::OrderMaterialization(_) => "order_materialization_failure",
            Self::LineItemInsert(_) => "line_item_insert_failure",
            Self::Repo(_) => "storage_error",
        }
    }
}
