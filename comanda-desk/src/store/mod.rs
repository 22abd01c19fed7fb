//! Collection store
//!
//! Document-store collaborator behind every order and catalog operation.
//!
//! - [`CollectionStore`]: backend-neutral async trait
//! - [`MemoryStore`]: process-local backend (tests, demo)
//! - [`RedbStore`]: durable single-file backend
//! - [`Collection`]: typed binding over one collection path
//!
//! Documents are JSON objects. The document id is the key, never part of
//! the stored body.

mod collection;
mod error;
mod memory;
mod path;
mod redb_store;
mod subscription;

pub use collection::{Collection, decode, decode_all, encode};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use path::{CollectionPath, RestaurantId, names};
pub use redb_store::RedbStore;
pub use subscription::{Subscription, SubscriptionHandle};

use crate::core::{Config, StoreBackend};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Document body
pub type Fields = Map<String, Value>;

/// Full collection contents at one point in time
pub type Snapshot = Arc<Vec<Document>>;

/// Stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Async document-store contract
///
/// Writes are last-write-wins; there are no version checks. `transfer` is
/// the only multi-document operation and is atomic.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// All documents in the collection
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Document>>;

    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Document>>;

    /// Insert under a new store-assigned id
    async fn create(&self, path: &CollectionPath, fields: Fields) -> StoreResult<String>;

    /// Create or replace the document at `id`
    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> StoreResult<()>;

    /// Shallow-merge `partial` into an existing document
    async fn update(&self, path: &CollectionPath, id: &str, partial: Fields) -> StoreResult<()>;

    /// Remove a document; removing a missing document is not an error
    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()>;

    /// Atomically write `fields` at `to/{id}` and remove `from/{id}`
    ///
    /// Fails with `NotFound` (and writes nothing) when the source is absent.
    async fn transfer(
        &self,
        from: &CollectionPath,
        id: &str,
        to: &CollectionPath,
        fields: Fields,
    ) -> StoreResult<()>;

    /// Current snapshot immediately, then one per change
    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription>;
}

/// Open the backend selected by configuration
pub fn open_store(config: &Config) -> StoreResult<Arc<dyn CollectionStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory collection store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redb => {
            let path = config.store_path();
            tracing::info!(path = %path.display(), "Opening redb collection store");
            Ok(Arc::new(RedbStore::open(path)?))
        }
    }
}

/// Drop any `id` key from a body about to be stored
pub(crate) fn strip_id(mut fields: Fields) -> Fields {
    fields.remove("id");
    fields
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
