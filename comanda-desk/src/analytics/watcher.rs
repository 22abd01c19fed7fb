//! Live analytics: recompute on every settled-orders snapshot

use super::{AnalyticsReport, Period, compute};
use crate::store::{Snapshot, Subscription, decode};
use chrono::Utc;
use chrono_tz::Tz;
use shared::order::Order;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Keeps an [`AnalyticsReport`] current for one restaurant
///
/// Recomputes when the `orderssuccess` snapshot changes or the period is
/// switched. Readers see only the latest report.
#[derive(Debug)]
pub struct AnalyticsWatcher {
    period_tx: watch::Sender<Period>,
    report_rx: watch::Receiver<AnalyticsReport>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AnalyticsWatcher {
    /// Start watching; `subscription` must be on an `orderssuccess` path
    pub fn spawn(mut subscription: Subscription, period: Period, tz: Tz) -> Self {
        let (period_tx, mut period_rx) = watch::channel(period);
        let mut snapshot = subscription.current();
        let initial = recompute(&snapshot, period, tz);
        let (report_tx, report_rx) = watch::channel(initial);

        let token = CancellationToken::new();
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    next = subscription.changed() => match next {
                        Some(next) => snapshot = next,
                        None => break,
                    },
                    changed = period_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let period = *period_rx.borrow_and_update();
                report_tx.send_replace(recompute(&snapshot, period, tz));
            }
            tracing::debug!("Analytics watcher stopped");
        });

        Self {
            period_tx,
            report_rx,
            token,
            task: Some(task),
        }
    }

    pub fn period(&self) -> Period {
        *self.period_tx.borrow()
    }

    /// Switch the reporting window (triggers a recompute)
    pub fn set_period(&self, period: Period) {
        self.period_tx.send_replace(period);
    }

    /// Latest report
    pub fn report(&self) -> AnalyticsReport {
        self.report_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalyticsReport> {
        self.report_rx.clone()
    }

    /// Stop recomputing and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for AnalyticsWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Undecodable orders are skipped; the rest still count
fn recompute(snapshot: &Snapshot, period: Period, tz: Tz) -> AnalyticsReport {
    let orders: Vec<Order> = snapshot
        .iter()
        .filter_map(|doc| match decode::<Order>(doc) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(order_id = %doc.id, error = %e, "Skipping undecodable settled order");
                None
            }
        })
        .collect();
    compute(&orders, period, Utc::now(), tz)
}
