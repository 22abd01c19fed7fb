//! Checkout / settlement
//!
//! # Settlement Flow
//!
//! ```text
//! finalize(restaurant, order_id, tender)
//!     ├─ 1. Load active order (absent → replay lookup in orderssuccess)
//!     ├─ 2. Reject terminal orders
//!     ├─ 3. Recompute total from line items
//!     ├─ 4. Cash tender: check received ≥ total, compute change
//!     ├─ 5. Build settled record (completada, confirmed payment method)
//!     └─ 6. transfer orders/{id} → orderssuccess/{id} (one atomic write)
//! ```
//!
//! Replaying a finalize for an order that is already settled returns the
//! stored settlement without writing. The cash check is not repeated on
//! replay.

use super::error::OrderError;
use super::money::{self, CashOutcome};
use crate::store::{CollectionPath, CollectionStore, RestaurantId, decode, encode};
use rust_decimal::Decimal;
use shared::order::{Order, OrderStatus, PaymentMethod};

/// Payment confirmed by the cashier
#[derive(Debug, Clone, PartialEq)]
pub struct Tender {
    pub method: PaymentMethod,
    /// Cash handed over; only meaningful for cash payments
    pub cash_received: Option<Decimal>,
}

impl Tender {
    pub fn new(method: impl Into<PaymentMethod>) -> Self {
        Self {
            method: method.into(),
            cash_received: None,
        }
    }

    pub fn cash(received: Decimal) -> Self {
        Self {
            method: PaymentMethod::cash(),
            cash_received: Some(received),
        }
    }

    /// Cash check at the boundary; `Some(change)` for cash with an amount
    fn check(&self, total: Decimal) -> Result<Option<Decimal>, OrderError> {
        if self.method.is_empty() {
            return Err(OrderError::validation("payment method is required"));
        }
        match self.cash_received {
            Some(received) if self.method.is_cash() => {
                money::validate_tendered(received)?;
                let CashOutcome { change } = money::validate_cash(total, received)?;
                Ok(Some(change))
            }
            _ => Ok(None),
        }
    }

    /// Change for a settlement that already happened; never rejects
    fn replay_change(&self, total: Decimal) -> Option<Decimal> {
        match self.cash_received {
            Some(received) if self.method.is_cash() => received
                .checked_sub(total)
                .map(|change| money::round_money(change).max(Decimal::ZERO)),
            _ => None,
        }
    }
}

/// Result of a finalized order
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Settled record as stored in `orderssuccess`
    pub order: Order,
    /// Change owed for cash payments with a tendered amount
    pub change: Option<Decimal>,
}

/// Settled copy of `order`
///
/// Status becomes `completada`, the payment method is overwritten with the
/// one the cashier confirmed and `total` is recomputed from the line items.
pub fn settle(order: &Order, method: &PaymentMethod) -> Result<Order, OrderError> {
    let mut settled = order.clone();
    settled.status = OrderStatus::Completada;
    settled.payment_method = Some(method.clone());
    settled.total = money::compute_total(&order.products)?;
    Ok(settled)
}

/// Settle an active order
pub async fn finalize(
    store: &dyn CollectionStore,
    restaurant: &RestaurantId,
    order_id: &str,
    tender: &Tender,
) -> Result<Settlement, OrderError> {
    let active_path = CollectionPath::orders(restaurant);
    let settled_path = CollectionPath::settled_orders(restaurant);

    let Some(doc) = store.get(&active_path, order_id).await? else {
        return replay(store, &settled_path, order_id, tender).await;
    };
    let order: Order = decode(&doc)?;

    if order.is_terminal() {
        return Err(OrderError::InvalidTransition {
            order_id: order_id.to_string(),
            from: order.status,
            to: OrderStatus::Completada,
        });
    }

    let settled = settle(&order, &tender.method).inspect_err(|e| {
        tracing::warn!(order_id = %order_id, error = %e, "Order total could not be computed");
    })?;
    let change = tender.check(settled.total)?;
    let fields = encode(&settled_path, &settled)?;

    match store
        .transfer(&active_path, order_id, &settled_path, fields)
        .await
    {
        Ok(()) => {}
        // Settled concurrently by another cashier
        Err(e) if e.is_not_found() => {
            return replay(store, &settled_path, order_id, tender).await;
        }
        Err(e) => {
            tracing::error!(
                restaurant = %restaurant,
                order_id = %order_id,
                error = %e,
                "Settlement write failed"
            );
            return Err(e.into());
        }
    }

    tracing::info!(
        restaurant = %restaurant,
        order_id = %order_id,
        method = %tender.method,
        total = %settled.total,
        "Order settled"
    );

    Ok(Settlement {
        order: settled,
        change,
    })
}

async fn replay(
    store: &dyn CollectionStore,
    settled_path: &CollectionPath,
    order_id: &str,
    tender: &Tender,
) -> Result<Settlement, OrderError> {
    let Some(doc) = store.get(settled_path, order_id).await? else {
        return Err(OrderError::OrderNotFound(order_id.to_string()));
    };
    let order: Order = decode(&doc)?;
    let change = tender.replay_change(order.total);

    tracing::debug!(order_id = %order_id, "Finalize replay, order already settled");
    Ok(Settlement { order, change })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, encode};
    use shared::order::OrderProduct;

    fn restaurant() -> RestaurantId {
        RestaurantId::new("r1")
    }

    fn line(price: i64, quantity: u32) -> OrderProduct {
        OrderProduct {
            product_id: "p1".into(),
            product_name: "Taco".into(),
            variant_id: "v1".into(),
            variant_label: "Pastor".into(),
            price: Decimal::from(price),
            quantity,
            image: String::new(),
            additions: None,
            total: None,
        }
    }

    fn order(status: OrderStatus, products: Vec<OrderProduct>, stored_total: i64) -> Order {
        Order {
            id: None,
            name: "Ana".into(),
            notes: None,
            payment_method: Some(PaymentMethod::new("Efectivo")),
            order_type: None,
            address: None,
            status,
            date: None,
            products,
            total: Decimal::from(stored_total),
        }
    }

    async fn seed(store: &MemoryStore, order: &Order) -> String {
        let path = CollectionPath::orders(&restaurant());
        store.create(&path, encode(&path, order).unwrap()).await.unwrap()
    }

    #[test]
    fn test_settle_overwrites_method_status_and_total() {
        let source = order(OrderStatus::PorCobrar, vec![line(50, 2)], 999);
        let settled = settle(&source, &PaymentMethod::card()).unwrap();
        assert_eq!(settled.status, OrderStatus::Completada);
        assert_eq!(settled.payment_method, Some(PaymentMethod::card()));
        assert_eq!(settled.total, Decimal::from(100));
        assert_eq!(settled.products, source.products);
    }

    #[tokio::test]
    async fn test_finalize_moves_order() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(50, 2)], 100)).await;

        let settlement = finalize(&store, &restaurant(), &id, &Tender::new("tarjeta"))
            .await
            .unwrap();
        assert_eq!(settlement.change, None);
        assert_eq!(settlement.order.status, OrderStatus::Completada);

        let active = store.list(&CollectionPath::orders(&restaurant())).await.unwrap();
        assert!(active.is_empty());
        let settled = store
            .list(&CollectionPath::settled_orders(&restaurant()))
            .await
            .unwrap();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].id, id);
        assert_eq!(settled[0].fields["paymentMethod"], "tarjeta");
    }

    #[tokio::test]
    async fn test_insufficient_cash_blocks_settlement() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(100, 1)], 100)).await;

        let err = finalize(&store, &restaurant(), &id, &Tender::cash(Decimal::from(80)))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientCash { deficit, .. } if deficit == Decimal::from(20)));

        // Nothing moved
        let active_path = CollectionPath::orders(&restaurant());
        assert!(store.get(&active_path, &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cash_change() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::EnCamino, vec![line(100, 1)], 100)).await;

        let settlement = finalize(&store, &restaurant(), &id, &Tender::cash(Decimal::from(150)))
            .await
            .unwrap();
        assert_eq!(settlement.change, Some(Decimal::from(50)));
    }

    #[tokio::test]
    async fn test_cash_without_amount_is_accepted() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(100, 1)], 100)).await;

        let settlement = finalize(&store, &restaurant(), &id, &Tender::new("efectivo"))
            .await
            .unwrap();
        assert_eq!(settlement.change, None);
    }

    #[tokio::test]
    async fn test_replay_returns_existing_settlement() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(30, 3)], 90)).await;

        let first = finalize(&store, &restaurant(), &id, &Tender::new("tarjeta"))
            .await
            .unwrap();
        let again = finalize(&store, &restaurant(), &id, &Tender::new("tarjeta"))
            .await
            .unwrap();
        assert_eq!(first.order, again.order);

        let settled = store
            .list(&CollectionPath::settled_orders(&restaurant()))
            .await
            .unwrap();
        assert_eq!(settled.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_order_cannot_settle() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::Cancelada, vec![line(30, 1)], 30)).await;

        let err = finalize(&store, &restaurant(), &id, &Tender::new("tarjeta"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { from: OrderStatus::Cancelada, .. }));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let store = MemoryStore::new();
        let err = finalize(&store, &restaurant(), "ghost", &Tender::new("tarjeta"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_empty_method_rejected() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(30, 1)], 30)).await;
        let err = finalize(&store, &restaurant(), &id, &Tender::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_replay_with_smaller_cash_keeps_settlement() {
        let store = MemoryStore::new();
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![line(100, 1)], 100)).await;

        let first = finalize(&store, &restaurant(), &id, &Tender::cash(Decimal::from(150)))
            .await
            .unwrap();
        assert_eq!(first.change, Some(Decimal::from(50)));

        let retry = finalize(&store, &restaurant(), &id, &Tender::cash(Decimal::from(20)))
            .await
            .unwrap();
        assert_eq!(retry.order, first.order);
        assert_eq!(retry.change, Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected() {
        let store = MemoryStore::new();
        let mut huge = line(1, 4_000_000_000);
        huge.price = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let id = seed(&store, &order(OrderStatus::PorCobrar, vec![huge], 0)).await;

        let err = finalize(&store, &restaurant(), &id, &Tender::new("tarjeta"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));

        // Still active
        let active_path = CollectionPath::orders(&restaurant());
        assert!(store.get(&active_path, &id).await.unwrap().is_some());
    }
}
