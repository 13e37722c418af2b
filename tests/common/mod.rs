//! Shared test fixtures: in-memory database plus seed helpers

#![allow(dead_code)]

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use bazaar_server::db::DbService;
use bazaar_server::db::models::{
    Availability, CustomerAddress, InputKind, LineItemInput, OrderKind, SellerCreate,
    SellerSettings,
};
use bazaar_server::db::repository::{CustomerAddressRepository, SellerRepository};
use bazaar_server::services::NewBroadcast;

pub async fn setup_db() -> Surreal<Db> {
    DbService::memory()
        .await
        .expect("in-memory database")
        .db
}

pub fn customer(key: &str) -> RecordId {
    RecordId::from_table_key("customer", key)
}

/// An approved, active seller that accepts custom orders
pub async fn seed_seller(
    db: &Surreal<Db>,
    name: &str,
    pricing_timeout_hours: i64,
    auto_cancel_after_hours: i64,
    delivery_fee: f64,
) -> RecordId {
    seed_seller_with(
        db,
        name,
        delivery_fee,
        Some(SellerSettings {
            pricing_timeout_hours,
            auto_cancel_after_hours,
        }),
        |_| {},
    )
    .await
}

/// Seller with defaults, then `tweak` applied to the create payload
pub async fn seed_seller_with(
    db: &Surreal<Db>,
    name: &str,
    delivery_fee: f64,
    settings: Option<SellerSettings>,
    tweak: impl FnOnce(&mut SellerCreate),
) -> RecordId {
    let mut data = SellerCreate {
        name: name.to_string(),
        logo_url: None,
        rating: Some(4.5),
        is_active: true,
        is_approved: true,
        supports_custom_orders: true,
        delivery_fee,
        settings,
    };
    tweak(&mut data);

    SellerRepository::new(db.clone())
        .create(data)
        .await
        .expect("seed seller")
        .id
        .expect("seller id")
}

pub async fn seed_address(db: &Surreal<Db>, customer_id: &RecordId) -> RecordId {
    CustomerAddressRepository::new(db.clone())
        .create(CustomerAddress {
            id: None,
            customer_id: customer_id.clone(),
            label: Some("Home".to_string()),
            street: "12 Harbor Lane".to_string(),
            city: "Tripoli".to_string(),
            district: Some("Gergarish".to_string()),
            phone: Some("+218-91-0000000".to_string()),
            latitude: Some(32.8872),
            longitude: Some(13.1913),
        })
        .await
        .expect("seed address")
        .id
        .expect("address id")
}

/// A plain text broadcast input for the given customer and sellers
pub fn text_broadcast(customer_id: &RecordId, seller_ids: Vec<RecordId>) -> NewBroadcast {
    NewBroadcast {
        customer_id: customer_id.clone(),
        input_kind: InputKind::Text,
        text: Some("2kg tomatoes, a bag of flat bread, one olive oil 1L".to_string()),
        voice_reference: None,
        image_references: None,
        notes: None,
        seller_ids,
        delivery_address_id: None,
        order_kind: OrderKind::Pickup,
    }
}

pub fn available_item(name: &str, unit_price: f64, quantity: i32) -> LineItemInput {
    LineItemInput {
        name: name.to_string(),
        unit_kind: Some("piece".to_string()),
        unit_price,
        quantity,
        availability: Availability::Available,
        substitute_total: None,
    }
}

pub fn unavailable_item(name: &str) -> LineItemInput {
    LineItemInput {
        name: name.to_string(),
        unit_kind: None,
        unit_price: 0.0,
        quantity: 1,
        availability: Availability::Unavailable,
        substitute_total: None,
    }
}

pub fn substituted_item(name: &str, substitute_total: f64) -> LineItemInput {
    LineItemInput {
        name: name.to_string(),
        unit_kind: None,
        unit_price: 0.0,
        quantity: 1,
        availability: Availability::Substituted,
        substitute_total: Some(substitute_total),
    }
}
