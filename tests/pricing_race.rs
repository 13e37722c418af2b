//! Quote submission: the claim race, rollback paths and price history

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use bazaar_server::db::models::{Order, OrderDraft, PricingLineItem, PricingRequestStatus};
use bazaar_server::db::repository::{
    OrderRepository, PriceHistoryRepository, PricingRequestRepository, RepoError, RepoResult,
};
use bazaar_server::services::{
    BroadcastError, BroadcastOrchestrator, OrderMaterializer, PricingEngine,
    SurrealOrderMaterializer,
};

use common::{available_item, customer, seed_seller, substituted_item, text_broadcast, unavailable_item};

/// Broadcast to one seller and return that seller's request id
async fn one_request(
    db: &Surreal<Db>,
    customer_id: &RecordId,
    seller_id: &RecordId,
) -> RecordId {
    let orchestrator = BroadcastOrchestrator::new(db.clone());
    let (_, requests) = orchestrator
        .create(text_broadcast(customer_id, vec![seller_id.clone()]))
        .await
        .unwrap();
    requests[0].id.clone().unwrap()
}

#[tokio::test]
async fn submit_prices_the_request_and_materializes_an_order() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 10.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let items = vec![
        available_item("tomatoes", 15.0, 2),
        available_item("olive oil", 10.0, 1),
    ];
    let engine = PricingEngine::new(db.clone());
    let outcome = engine.submit(&request_id, &seller, items, 10.0).await.unwrap();

    assert_eq!(outcome.subtotal, 40.0);
    assert_eq!(outcome.delivery_fee, 10.0);
    assert_eq!(outcome.total, 50.0);

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, PricingRequestStatus::Priced);
    assert_eq!(request.order_id, Some(outcome.order_id.clone()));
    assert_eq!(request.items_count, 2);
    assert_eq!(request.subtotal, 40.0);
    assert_eq!(request.total, 50.0);
    assert!(request.claimed_at.is_some());
    assert!(request.priced_at.is_some());

    let orders = OrderRepository::new(db.clone());
    let order = orders.find_by_id(&outcome.order_id).await.unwrap().unwrap();
    assert_eq!(order.seller_id, seller);
    assert_eq!(order.customer_id, customer_id);
    assert_eq!(order.total, 50.0);

    let lines = orders.find_line_items(&outcome.order_id).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "tomatoes");
    assert_eq!(lines[0].line_total, 30.0);
    assert_eq!(lines[0].display_order, 0);
    assert_eq!(lines[1].display_order, 1);
}

#[tokio::test]
async fn mixed_availability_prices_only_fulfillable_lines() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let items = vec![
        available_item("rice", 8.0, 2),
        unavailable_item("saffron"),
        substituted_item("butter", 6.5),
    ];
    let engine = PricingEngine::new(db.clone());
    let outcome = engine.submit(&request_id, &seller, items, 0.0).await.unwrap();

    // 16.00 + 6.50; the unavailable line contributes nothing
    assert_eq!(outcome.subtotal, 22.5);
    assert_eq!(outcome.total, 22.5);

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.items_count, 2);

    // All three lines persist, the unavailable one priced at zero
    let lines = OrderRepository::new(db.clone())
        .find_line_items(&outcome.order_id)
        .await
        .unwrap();
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn concurrent_submissions_produce_exactly_one_order() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 2.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    // Two copies of the same submission racing (double-click)
    let engine_a = PricingEngine::new(db.clone());
    let engine_b = PricingEngine::new(db.clone());
    let items = vec![available_item("flour", 4.0, 3)];

    let (a, b) = tokio::join!(
        engine_a.submit(&request_id, &seller, items.clone(), 2.0),
        engine_b.submit(&request_id, &seller, items.clone(), 2.0),
    );

    let (wins, losses): (Vec<_>, Vec<_>) = [a, b].into_iter().partition(|r| r.is_ok());
    assert_eq!(wins.len(), 1, "exactly one submission must win");
    for loss in losses {
        let err = loss.unwrap_err();
        assert!(
            matches!(
                err,
                BroadcastError::ClaimLost | BroadcastError::AlreadyClaimedOrPriced
            ),
            "loser saw {err:?}"
        );
    }

    assert_eq!(OrderRepository::new(db.clone()).count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn resubmission_after_pricing_is_rejected() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let engine = PricingEngine::new(db.clone());
    let items = vec![available_item("milk", 3.0, 1)];
    engine.submit(&request_id, &seller, items.clone(), 0.0).await.unwrap();

    let err = engine.submit(&request_id, &seller, items, 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::AlreadyClaimedOrPriced));
    assert_eq!(OrderRepository::new(db.clone()).count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn only_the_assigned_seller_may_submit() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Assigned", 24, 48, 0.0).await;
    let other = seed_seller(&db, "Other", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let engine = PricingEngine::new(db.clone());
    let items = vec![available_item("eggs", 0.5, 12)];

    let err = engine.submit(&request_id, &other, items.clone(), 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::Unauthorized));

    let ghost = RecordId::from_table_key("pricing_request", "ghost");
    let err = engine.submit(&ghost, &seller, items, 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::NotFound));
}

#[tokio::test]
async fn expired_deadline_blocks_submission() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    db.query("UPDATE $id SET pricing_expires_at = $past")
        .bind(("id", request_id.clone()))
        .bind(("past", Utc::now() - Duration::hours(1)))
        .await
        .unwrap()
        .check()
        .unwrap();

    let engine = PricingEngine::new(db.clone());
    let items = vec![available_item("bread", 1.0, 4)];
    let err = engine.submit(&request_id, &seller, items, 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::DeadlineExpired));

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, PricingRequestStatus::Pending);
}

#[tokio::test]
async fn invalid_line_items_touch_no_state() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let engine = PricingEngine::new(db.clone());

    let err = engine.submit(&request_id, &seller, vec![], 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::InvalidLineItems(_)));

    let err = engine
        .submit(&request_id, &seller, vec![available_item("rice", -1.0, 1)], 0.0)
        .await
        .unwrap_err();
    assert!(matches!(err, BroadcastError::InvalidLineItems(_)));

    let err = engine
        .submit(&request_id, &seller, vec![available_item("rice", 1.0, 1)], -2.0)
        .await
        .unwrap_err();
    assert!(matches!(err, BroadcastError::InvalidLineItems(_)));

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, PricingRequestStatus::Pending);
    assert_eq!(OrderRepository::new(db.clone()).count_all().await.unwrap(), 0);
}

/// Materializer double that fails at a chosen step and otherwise delegates
struct FailingMaterializer {
    inner: SurrealOrderMaterializer,
    fail_create: bool,
    fail_line_items: bool,
}

impl FailingMaterializer {
    fn new(db: Surreal<Db>, fail_create: bool, fail_line_items: bool) -> Self {
        Self {
            inner: SurrealOrderMaterializer::new(db),
            fail_create,
            fail_line_items,
        }
    }
}

#[async_trait]
impl OrderMaterializer for FailingMaterializer {
    async fn create_order(&self, draft: OrderDraft) -> RepoResult<Order> {
        if self.fail_create {
            return Err(RepoError::Database("induced order failure".into()));
        }
        self.inner.create_order(draft).await
    }

    async fn insert_line_items(&self, items: Vec<PricingLineItem>) -> RepoResult<()> {
        if self.fail_line_items {
            return Err(RepoError::Database("induced line item failure".into()));
        }
        self.inner.insert_line_items(items).await
    }

    async fn delete_order(&self, order_id: &RecordId) -> RepoResult<()> {
        self.inner.delete_order(order_id).await
    }
}

#[tokio::test]
async fn failed_order_creation_rolls_the_claim_back() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 1.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let failing = Arc::new(FailingMaterializer::new(db.clone(), true, false));
    let engine = PricingEngine::with_materializer(db.clone(), failing);
    let items = vec![available_item("dates", 7.0, 1)];

    let err = engine.submit(&request_id, &seller, items.clone(), 1.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::OrderMaterialization(_)));

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, PricingRequestStatus::Pending);
    assert!(request.claimed_at.is_none());
    assert_eq!(OrderRepository::new(db.clone()).count_all().await.unwrap(), 0);

    // The rollback left the request claimable again
    let engine = PricingEngine::new(db.clone());
    let outcome = engine.submit(&request_id, &seller, items, 1.0).await.unwrap();
    assert_eq!(outcome.total, 8.0);
}

#[tokio::test]
async fn failed_line_item_insert_leaves_no_orphan_order() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let request_id = one_request(&db, &customer_id, &seller).await;

    let failing = Arc::new(FailingMaterializer::new(db.clone(), false, true));
    let engine = PricingEngine::with_materializer(db.clone(), failing);
    let items = vec![available_item("honey", 12.0, 1)];

    let err = engine.submit(&request_id, &seller, items, 0.0).await.unwrap_err();
    assert!(matches!(err, BroadcastError::LineItemInsert(_)));

    let request = PricingRequestRepository::new(db.clone())
        .find_by_id(&request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, PricingRequestStatus::Pending);
    assert!(request.order_id.is_none());
    assert_eq!(OrderRepository::new(db.clone()).count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn price_history_deduplicates_by_item_name() {
    let db = common::setup_db().await;
    let customer_id = customer("amal");
    let seller = seed_seller(&db, "Seller", 24, 48, 0.0).await;
    let engine = PricingEngine::new(db.clone());
    let history = PriceHistoryRepository::new(db.clone());

    let first_request = one_request(&db, &customer_id, &seller).await;
    engine
        .submit(
            &first_request,
            &seller,
            vec![
                available_item("Tomatoes", 5.0, 1),
                unavailable_item("saffron"),
            ],
            0.0,
        )
        .await
        .unwrap();

    let entries = history
        .recent_for_customer(&seller, &customer_id, 10)
        .await
        .unwrap();
    // Unavailable lines never enter the history
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].item_name_normalized, "tomatoes");
    assert_eq!(entries[0].unit_price, 5.0);

    // Same item re-quoted in a later broadcast replaces the entry
    let second_request = one_request(&db, &customer_id, &seller).await;
    engine
        .submit(
            &second_request,
            &seller,
            vec![available_item("  tomatoes ", 6.0, 2)],
            0.0,
        )
        .await
        .unwrap();

    let entries = history
        .recent_for_customer(&seller, &customer_id, 10)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].unit_price, 6.0);
    assert_eq!(entries[0].quantity, 2);
}
