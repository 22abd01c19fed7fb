//! New-order detection for the kitchen board
//!
//! The first snapshot only sets the baseline; after that every growth of
//! the `orders` collection raises one [`NewOrderAlert`]. Alerts are
//! best-effort: with nobody listening they are dropped.

use crate::store::{RestaurantId, Subscription, SubscriptionHandle};
use tokio::sync::broadcast;

/// Raised when the active order collection grows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderAlert {
    pub restaurant: RestaurantId,
    /// How many documents appeared since the previous snapshot
    pub new_orders: usize,
    /// Documents in the collection now
    pub total_orders: usize,
}

/// Remembers the last seen collection size
#[derive(Debug, Default)]
pub struct NewOrderDetector {
    last_seen: Option<usize>,
}

impl NewOrderDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(n)` when `count` grew by `n` since the previous call
    pub fn observe(&mut self, count: usize) -> Option<usize> {
        let grown = match self.last_seen {
            Some(prev) if count > prev => Some(count - prev),
            _ => None,
        };
        self.last_seen = Some(count);
        grown
    }
}

/// Run a detector over an `orders` subscription, publishing alerts
pub fn spawn_detector(
    subscription: Subscription,
    restaurant: RestaurantId,
    alerts: broadcast::Sender<NewOrderAlert>,
) -> SubscriptionHandle {
    let mut detector = NewOrderDetector::new();
    subscription.spawn(move |snapshot| {
        let Some(new_orders) = detector.observe(snapshot.len()) else {
            return;
        };
        let alert = NewOrderAlert {
            restaurant: restaurant.clone(),
            new_orders,
            total_orders: snapshot.len(),
        };
        if let Err(e) = alerts.send(alert) {
            // 提醒失败不影响订单流程
            tracing::debug!(restaurant = %restaurant, error = %e, "New order alert dropped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CollectionPath, CollectionStore, Fields, MemoryStore};

    #[test]
    fn test_first_snapshot_is_baseline() {
        let mut detector = NewOrderDetector::new();
        assert_eq!(detector.observe(3), None);
        assert_eq!(detector.observe(3), None);
        assert_eq!(detector.observe(5), Some(2));
        // Shrinking (settled / deleted) is silent
        assert_eq!(detector.observe(4), None);
        assert_eq!(detector.observe(5), Some(1));
    }

    #[tokio::test]
    async fn test_alerts_on_new_documents() {
        let store = MemoryStore::new();
        let restaurant = RestaurantId::new("r1");
        let path = CollectionPath::orders(&restaurant);
        store.create(&path, Fields::new()).await.unwrap();

        let (tx, mut rx) = broadcast::channel(8);
        let sub = store.subscribe(&path).await.unwrap();
        let handle = spawn_detector(sub, restaurant.clone(), tx);

        // Let the task record its baseline
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        store.create(&path, Fields::new()).await.unwrap();
        let alert = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alert.restaurant, restaurant);
        assert_eq!(alert.new_orders, 1);
        assert_eq!(alert.total_orders, 2);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_no_listener_is_not_an_error() {
        let store = MemoryStore::new();
        let restaurant = RestaurantId::new("r1");
        let path = CollectionPath::orders(&restaurant);

        let (tx, rx) = broadcast::channel(8);
        drop(rx);
        let handle = spawn_detector(store.subscribe(&path).await.unwrap(), restaurant, tx);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        store.create(&path, Fields::new()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }
}
