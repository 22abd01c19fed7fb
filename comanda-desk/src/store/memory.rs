//! In-memory collection store

use super::subscription::{Watchers, attach, is_watched, publish};
use super::{
    CollectionPath, CollectionStore, Document, Fields, Snapshot, StoreError, StoreResult,
    Subscription, new_document_id, strip_id,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

type Collections = HashMap<CollectionPath, BTreeMap<String, Fields>>;

/// Process-local store; every collection sits behind one lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
    watchers: Watchers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(collections: &Collections, path: &CollectionPath) -> Snapshot {
        Arc::new(
            collections
                .get(path)
                .map(|docs| {
                    docs.iter()
                        .map(|(id, fields)| Document {
                            id: id.clone(),
                            fields: fields.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        )
    }

    /// Apply `mutate` and publish the touched collections
    fn write<T>(
        &self,
        touched: &[&CollectionPath],
        mutate: impl FnOnce(&mut Collections) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let senders = self.watchers.lock();
        let mut collections = self.collections.lock();
        let out = mutate(&mut *collections)?;

        for path in touched {
            if is_watched(&senders, path) {
                publish(&senders, path, Self::snapshot(&collections, path));
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Document>> {
        let collections = self.collections.lock();
        Ok(Self::snapshot(&collections, path).as_ref().clone())
    }

    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.lock();
        Ok(collections
            .get(path)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn create(&self, path: &CollectionPath, fields: Fields) -> StoreResult<String> {
        let id = new_document_id();
        self.write(&[path], |collections| {
            collections
                .entry(path.clone())
                .or_default()
                .insert(id.clone(), strip_id(fields));
            Ok(())
        })?;
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> StoreResult<()> {
        self.write(&[path], |collections| {
            collections
                .entry(path.clone())
                .or_default()
                .insert(id.to_string(), strip_id(fields));
            Ok(())
        })
    }

    async fn update(&self, path: &CollectionPath, id: &str, partial: Fields) -> StoreResult<()> {
        self.write(&[path], |collections| {
            let doc = collections
                .get_mut(path)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::not_found(path, id))?;
            doc.extend(strip_id(partial));
            Ok(())
        })
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        self.write(&[path], |collections| {
            if let Some(docs) = collections.get_mut(path) {
                docs.remove(id);
            }
            Ok(())
        })
    }

    async fn transfer(
        &self,
        from: &CollectionPath,
        id: &str,
        to: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<()> {
        self.write(&[from, to], |collections| {
            collections
                .get_mut(from)
                .and_then(|docs| docs.remove(id))
                .ok_or_else(|| StoreError::not_found(from, id))?;
            collections
                .entry(to.clone())
                .or_default()
                .insert(id.to_string(), strip_id(fields));
            Ok(())
        })
    }

    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        let mut senders = self.watchers.lock();
        attach(&mut senders, path, || {
            let collections = self.collections.lock();
            Ok(Self::snapshot(&collections, path))
        })
    }
}
