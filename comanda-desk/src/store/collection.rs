//! Typed collection binding

use super::{CollectionPath, CollectionStore, Document, Fields, StoreError, StoreResult, Subscription};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// One collection path bound to a document type
///
/// Decoding injects the document id into the `id` field; encoding drops it,
/// so the id never ends up in the stored body.
pub struct Collection<T> {
    store: Arc<dyn CollectionStore>,
    path: CollectionPath,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn CollectionStore>, path: CollectionPath) -> Self {
        Self {
            store,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub async fn list(&self) -> StoreResult<Vec<T>> {
        let docs = self.store.list(&self.path).await?;
        decode_all(&docs)
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(&self.path, id).await? {
            Some(doc) => Ok(Some(decode(&doc)?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, item: &T) -> StoreResult<String> {
        let fields = encode(&self.path, item)?;
        self.store.create(&self.path, fields).await
    }

    pub async fn set(&self, id: &str, item: &T) -> StoreResult<()> {
        let fields = encode(&self.path, item)?;
        self.store.set(&self.path, id, fields).await
    }

    /// Shallow merge of raw fields (store field names)
    pub async fn update(&self, id: &str, partial: Fields) -> StoreResult<()> {
        self.store.update(&self.path, id, partial).await
    }

    /// Merge every field of `item` into an existing document
    pub async fn update_item(&self, id: &str, item: &T) -> StoreResult<()> {
        let fields = encode(&self.path, item)?;
        self.store.update(&self.path, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.delete(&self.path, id).await
    }

    /// Raw subscription; decode snapshots with [`decode_all`]
    pub async fn subscribe(&self) -> StoreResult<Subscription> {
        self.store.subscribe(&self.path).await
    }
}

/// Decode a document into `T`, with its id in the `id` field
pub fn decode<T: DeserializeOwned>(doc: &Document) -> StoreResult<T> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_string(), Value::String(doc.id.clone()));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

pub fn decode_all<T: DeserializeOwned>(docs: &[Document]) -> StoreResult<Vec<T>> {
    docs.iter().map(decode).collect()
}

/// Encode `T` as a document body (without `id`)
pub fn encode<T: Serialize>(path: &CollectionPath, item: &T) -> StoreResult<Fields> {
    match serde_json::to_value(item)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        _ => Err(StoreError::NotAnObject(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RestaurantId};
    use shared::models::Category;

    fn categories() -> Collection<Category> {
        Collection::new(
            Arc::new(MemoryStore::new()),
            CollectionPath::categories(&RestaurantId::new("r1")),
        )
    }

    fn tacos() -> Category {
        Category {
            id: Some("will-be-replaced".into()),
            name: "Tacos".into(),
            description: None,
            route: "tacos".into(),
            colorbg: "#ffaa00".into(),
            banner: None,
        }
    }

    #[tokio::test]
    async fn test_round_trip_injects_id() {
        let col = categories();
        let id = col.create(&tacos()).await.unwrap();

        let back = col.get(&id).await.unwrap().unwrap();
        assert_eq!(back.id.as_deref(), Some(id.as_str()));
        assert_eq!(back.name, "Tacos");

        let all = col.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_set_and_delete() {
        let col = categories();
        col.set("fixed", &tacos()).await.unwrap();
        assert!(col.get("fixed").await.unwrap().is_some());

        col.delete("fixed").await.unwrap();
        assert!(col.get("fixed").await.unwrap().is_none());
    }

    #[test]
    fn test_encode_rejects_non_objects() {
        let path = CollectionPath::restaurants();
        let err = encode(&path, &42).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject(_)));
    }
}
