use super::*;
use crate::orders::money::compute_total;
use crate::store::MemoryStore;
use chrono::{Duration, TimeZone};
use rust_decimal::Decimal;
use shared::order::{OrderProduct, OrderType, PaymentMethod};


fn create_test_manager() -> OrdersManager {
    OrdersManager::with_store(Arc::new(MemoryStore::new()))
}

fn restaurant() -> RestaurantId {
    RestaurantId::new("r1")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 13, 0, 0).unwrap()
}

fn product(name: &str, price: Decimal, quantity: u32) -> OrderProduct {
    OrderProduct {
        product_id: format!("p-{}", name.to_lowercase()),
        product_name: name.to_string(),
        variant_id: String::new(),
        variant_label: String::new(),
        price,
        quantity,
        image: String::new(),
        additions: None,
        total: None,
    }
}

fn draft(name: &str, products: Vec<OrderProduct>) -> OrderDraft {
    OrderDraft {
        name: name.to_string(),
        notes: None,
        payment_method: Some(PaymentMethod::cash()),
        order_type: Some(OrderType::ComerAca),
        address: None,
        products,
    }
}

// ========================================================================
// Helper: place an order worth 2 × 25.50 + 1 × 18.00 = 69.00
// ========================================================================

async fn place_sample_order(manager: &OrdersManager, placed_at: DateTime<Utc>) -> Order {
    let products = vec![
        product("Taco", Decimal::new(2550, 2), 2),
        product("Agua", Decimal::new(1800, 2), 1),
    ];
    manager
        .place_order(&restaurant(), draft("Mesa 4", products), placed_at)
        .await
        .unwrap()
}
