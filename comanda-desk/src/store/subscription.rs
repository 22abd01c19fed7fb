//! Live snapshot delivery
//!
//! Every watched collection owns one `watch` channel. Writers publish the
//! full post-write snapshot; a slow subscriber only ever sees the latest
//! one (intermediate snapshots may be coalesced).

use super::{CollectionPath, Snapshot, StoreResult};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Receiver side of a collection subscription
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self { rx }
    }

    /// Latest snapshot (marks it as seen)
    pub fn current(&mut self) -> Snapshot {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Run `on_snapshot` on a background task: once with the current
    /// snapshot, then on every change, until the handle is cancelled or
    /// dropped.
    pub fn spawn<F>(mut self, mut on_snapshot: F) -> SubscriptionHandle
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            on_snapshot(self.current());
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    next = self.changed() => match next {
                        Some(snapshot) => on_snapshot(snapshot),
                        None => break,
                    },
                }
            }
        });

        SubscriptionHandle {
            token,
            task: Some(task),
        }
    }
}

/// Handle for a callback subscription; cancelling or dropping it ends the task
#[derive(Debug)]
pub struct SubscriptionHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Cancel and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Per-collection snapshot senders shared by the backends
#[derive(Debug, Default)]
pub(crate) struct Watchers {
    senders: Mutex<HashMap<CollectionPath, watch::Sender<Snapshot>>>,
}

pub(crate) type WatcherGuard<'a> = MutexGuard<'a, HashMap<CollectionPath, watch::Sender<Snapshot>>>;

impl Watchers {
    /// Writers hold this across their write so publishes are ordered
    pub(crate) fn lock(&self) -> WatcherGuard<'_> {
        self.senders.lock()
    }
}

/// Whether anyone is listening on `path`
pub(crate) fn is_watched(senders: &WatcherGuard<'_>, path: &CollectionPath) -> bool {
    senders.get(path).is_some_and(|tx| !tx.is_closed())
}

/// Attach a receiver, loading a fresh snapshot when the channel is new or
/// was left without receivers (its value may be stale)
pub(crate) fn attach(
    senders: &mut WatcherGuard<'_>,
    path: &CollectionPath,
    load: impl FnOnce() -> StoreResult<Snapshot>,
) -> StoreResult<Subscription> {
    if let Some(tx) = senders.get(path) {
        if tx.is_closed() {
            tx.send_replace(load()?);
        }
        return Ok(Subscription::new(tx.subscribe()));
    }

    let (tx, rx) = watch::channel(load()?);
    senders.insert(path.clone(), tx);
    Ok(Subscription::new(rx))
}

pub(crate) fn publish(senders: &WatcherGuard<'_>, path: &CollectionPath, snapshot: Snapshot) {
    if let Some(tx) = senders.get(path) {
        tx.send_replace(snapshot);
    }
}
