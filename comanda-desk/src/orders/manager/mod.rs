//! OrdersManager - order lifecycle over the collection store
//!
//! This module handles:
//! - Intake of validated drafts into `orders`
//! - Status changes (partial `{state}` writes, last write wins)
//! - Settlement into `orderssuccess` (see [`checkout`](super::checkout))
//! - Operator views (kitchen board, cashier queue, history)
//! - New-order alerts (broadcast, best-effort)
//!
//! # Status Flow
//!
//! ```text
//! place_order ─► pendiente ─► enProceso ─► enCamino ─► porCobrar ─► finalize
//!                    │             │            │           │
//!                    └─────────────┴────────────┴───────────┴─► cancelada
//! ```
//!
//! Every operation takes the restaurant explicitly; there is no ambient
//! "current restaurant".

use super::board;
use super::checkout::{self, Settlement, Tender};
use super::error::{OrderError, OrderResult};
use super::feed::{self, NewOrderAlert};
use super::intake::OrderDraft;
use super::state_machine::transition;
use crate::core::Config;
use crate::store::{
    Collection, CollectionPath, CollectionStore, Fields, RestaurantId, Subscription,
    SubscriptionHandle, decode_all,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use shared::order::{Order, OrderStatus};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::instrument;

/// Default alert channel capacity
const ALERT_CHANNEL_CAPACITY: usize = 64;

/// Order lifecycle service
#[derive(Clone)]
pub struct OrdersManager {
    store: Arc<dyn CollectionStore>,
    /// 业务时区
    tz: Tz,
    delay_threshold_minutes: i64,
    alerts: broadcast::Sender<NewOrderAlert>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("tz", &self.tz)
            .field("delay_threshold_minutes", &self.delay_threshold_minutes)
            .field("alert_receivers", &self.alerts.receiver_count())
            .finish()
    }
}

impl OrdersManager {
    pub fn new(store: Arc<dyn CollectionStore>, config: &Config) -> Self {
        let (alerts, _) = broadcast::channel(config.event_channel_capacity);
        Self {
            store,
            tz: config.timezone,
            delay_threshold_minutes: config.delay_threshold_minutes,
            alerts,
        }
    }

    /// Manager with UTC business time and default thresholds
    pub fn with_store(store: Arc<dyn CollectionStore>) -> Self {
        let (alerts, _) = broadcast::channel(ALERT_CHANNEL_CAPACITY);
        Self {
            store,
            tz: Tz::UTC,
            delay_threshold_minutes: board::DEFAULT_DELAY_THRESHOLD_MINUTES,
            alerts,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn store(&self) -> &Arc<dyn CollectionStore> {
        &self.store
    }

    fn active(&self, restaurant: &RestaurantId) -> Collection<Order> {
        Collection::new(self.store.clone(), CollectionPath::orders(restaurant))
    }

    fn settled(&self, restaurant: &RestaurantId) -> Collection<Order> {
        Collection::new(self.store.clone(), CollectionPath::settled_orders(restaurant))
    }

    // ========== Intake ==========

    /// Validate and store a new order (`pendiente`, dated `now`)
    #[instrument(skip(self, draft), fields(restaurant = %restaurant))]
    pub async fn place_order(
        &self,
        restaurant: &RestaurantId,
        draft: OrderDraft,
        now: DateTime<Utc>,
    ) -> OrderResult<Order> {
        if let Err(e) = draft.validate() {
            tracing::warn!(restaurant = %restaurant, error = %e, "Order draft rejected");
            return Err(e);
        }

        let mut order = draft.into_order(now)?;
        let id = self.active(restaurant).create(&order).await?;
        order.id = Some(id);

        tracing::info!(
            restaurant = %restaurant,
            order_id = %order.id_str(),
            items = order.products.len(),
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    // ========== Reads ==========

    pub async fn get_order(&self, restaurant: &RestaurantId, order_id: &str) -> OrderResult<Order> {
        self.active(restaurant)
            .get(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    pub async fn active_orders(&self, restaurant: &RestaurantId) -> OrderResult<Vec<Order>> {
        let orders = self.active(restaurant).list().await?;
        tracing::debug!(restaurant = %restaurant, count = orders.len(), "Loaded active orders");
        Ok(orders)
    }

    pub async fn settled_orders(&self, restaurant: &RestaurantId) -> OrderResult<Vec<Order>> {
        let orders = self.settled(restaurant).list().await?;
        tracing::debug!(restaurant = %restaurant, count = orders.len(), "Loaded settled orders");
        Ok(orders)
    }

    /// Kitchen board: active orders, oldest first
    pub async fn kitchen_board(&self, restaurant: &RestaurantId) -> OrderResult<Vec<Order>> {
        Ok(board::kitchen_board(&self.active_orders(restaurant).await?, self.tz))
    }

    /// Cashier / cancelled view of the `orders` collection, oldest first
    pub async fn history(&self, restaurant: &RestaurantId) -> OrderResult<Vec<Order>> {
        Ok(board::history(&self.active_orders(restaurant).await?, self.tz))
    }

    /// Orders waiting for payment, oldest first
    pub async fn billing_queue(&self, restaurant: &RestaurantId) -> OrderResult<Vec<Order>> {
        Ok(board::billing_queue(&self.active_orders(restaurant).await?, self.tz))
    }

    pub fn is_delayed(&self, order: &Order, now: DateTime<Utc>) -> bool {
        board::is_delayed(order, now, self.tz, self.delay_threshold_minutes)
    }

    // ========== Status changes ==========

    /// Move an order to `status`, persisting only the `state` field
    #[instrument(skip(self), fields(restaurant = %restaurant))]
    pub async fn change_status(
        &self,
        restaurant: &RestaurantId,
        order_id: &str,
        status: OrderStatus,
    ) -> OrderResult<Order> {
        let current = self.get_order(restaurant, order_id).await?;
        let next = match transition(&current, status) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Status change rejected");
                return Err(e);
            }
        };

        if next.status == current.status {
            return Ok(next);
        }

        let mut partial = Fields::new();
        partial.insert("state".to_string(), Value::from(status.as_str()));
        self.active(restaurant).update(order_id, partial).await?;

        tracing::info!(
            restaurant = %restaurant,
            order_id = %order_id,
            from = %current.status,
            to = %next.status,
            "Order status changed"
        );
        Ok(next)
    }

    /// Kitchen hands the order to the cashier
    pub async fn send_to_cashier(
        &self,
        restaurant: &RestaurantId,
        order_id: &str,
    ) -> OrderResult<Order> {
        self.change_status(restaurant, order_id, OrderStatus::PorCobrar)
            .await
    }

    pub async fn cancel_order(
        &self,
        restaurant: &RestaurantId,
        order_id: &str,
    ) -> OrderResult<Order> {
        self.change_status(restaurant, order_id, OrderStatus::Cancelada)
            .await
    }

    /// Discard an active order; deleting a missing order is a no-op
    pub async fn delete_order(&self, restaurant: &RestaurantId, order_id: &str) -> OrderResult<()> {
        self.active(restaurant).delete(order_id).await?;
        tracing::info!(restaurant = %restaurant, order_id = %order_id, "Order deleted");
        Ok(())
    }

    // ========== Settlement ==========

    /// Settle an order into `orderssuccess`
    #[instrument(skip(self, tender), fields(restaurant = %restaurant, method = %tender.method))]
    pub async fn finalize(
        &self,
        restaurant: &RestaurantId,
        order_id: &str,
        tender: &Tender,
    ) -> OrderResult<Settlement> {
        checkout::finalize(self.store.as_ref(), restaurant, order_id, tender)
            .await
            .inspect_err(|e| tracing::warn!(order_id = %order_id, error = %e, "Finalize failed"))
    }

    // ========== Live updates ==========

    pub async fn subscribe_orders(&self, restaurant: &RestaurantId) -> OrderResult<Subscription> {
        Ok(self.active(restaurant).subscribe().await?)
    }

    pub async fn subscribe_settled(&self, restaurant: &RestaurantId) -> OrderResult<Subscription> {
        Ok(self.settled(restaurant).subscribe().await?)
    }

    /// Decode a live snapshot of either order collection
    pub fn decode_snapshot(&self, snapshot: &crate::store::Snapshot) -> OrderResult<Vec<Order>> {
        Ok(decode_all(snapshot)?)
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<NewOrderAlert> {
        self.alerts.subscribe()
    }

    /// Start raising [`NewOrderAlert`]s for a restaurant
    pub async fn watch_new_orders(
        &self,
        restaurant: &RestaurantId,
    ) -> OrderResult<SubscriptionHandle> {
        let subscription = self.subscribe_orders(restaurant).await?;
        tracing::info!(restaurant = %restaurant, "Watching for new orders");
        Ok(feed::spawn_detector(
            subscription,
            restaurant.clone(),
            self.alerts.clone(),
        ))
    }
}

#[cfg(test)]
mod tests;
