//! redb-backed collection store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `documents` | `(collection_path, document_id)` | JSON object | All collections |
//!
//! Keys sort by collection path first, so listing a collection is a single
//! range scan. `transfer` runs in one write transaction.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a write is on disk
//! once `commit()` returns, and the file is always in a consistent state
//! (copy-on-write with atomic pointer swap).

use super::subscription::{Watchers, attach, is_watched, publish};
use super::{
    CollectionPath, CollectionStore, Document, Fields, StoreError, StoreResult, Subscription,
    new_document_id, strip_id,
};
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, Table, TableDefinition};
use std::path::Path;
use std::sync::Arc;

type DocKey = (&'static str, &'static str);

/// key = (collection path, document id), value = JSON-serialized document body
const DOCUMENTS_TABLE: TableDefinition<DocKey, &[u8]> = TableDefinition::new("documents");

type DocTable<'txn> = Table<'txn, DocKey, &'static [u8]>;

/// Collection store backed by a single redb file
pub struct RedbStore {
    db: Arc<Database>,
    watchers: Watchers,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // 建表 (幂等)
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DOCUMENTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            watchers: Watchers::default(),
        })
    }

    fn read_collection(&self, path: &CollectionPath) -> StoreResult<Vec<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS_TABLE)?;
        collect(&table, path)
    }

    /// Run `apply` in one write transaction, then publish the touched
    /// collections. Nothing is committed if `apply` fails.
    fn write<T>(
        &self,
        touched: &[&CollectionPath],
        apply: impl FnOnce(&mut DocTable<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let senders = self.watchers.lock();
        let txn = self.db.begin_write()?;

        let (out, snapshots) = {
            let mut table = txn.open_table(DOCUMENTS_TABLE)?;
            let out = apply(&mut table)?;

            let mut snapshots = Vec::new();
            for path in touched {
                if is_watched(&senders, path) {
                    snapshots.push(((*path).clone(), Arc::new(collect(&table, path)?)));
                }
            }
            (out, snapshots)
        };
        txn.commit()?;

        for (path, snapshot) in snapshots {
            publish(&senders, &path, snapshot);
        }
        Ok(out)
    }
}

fn collect(
    table: &impl ReadableTable<DocKey, &'static [u8]>,
    path: &CollectionPath,
) -> StoreResult<Vec<Document>> {
    let mut documents = Vec::new();
    for entry in table.range((path.as_str(), "")..)? {
        let (key, value) = entry?;
        let (doc_path, id) = key.value();
        if doc_path != path.as_str() {
            break;
        }
        documents.push(Document {
            id: id.to_string(),
            fields: decode(value.value())?,
        });
    }
    Ok(documents)
}

fn decode(bytes: &[u8]) -> StoreResult<Fields> {
    Ok(serde_json::from_slice(bytes)?)
}

fn put(
    table: &mut DocTable<'_>,
    path: &CollectionPath,
    id: &str,
    fields: Fields,
) -> StoreResult<()> {
    let bytes = serde_json::to_vec(&strip_id(fields))?;
    table.insert((path.as_str(), id), bytes.as_slice())?;
    Ok(())
}

#[async_trait]
impl CollectionStore for RedbStore {
    async fn list(&self, path: &CollectionPath) -> StoreResult<Vec<Document>> {
        self.read_collection(path)
    }

    async fn get(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Document>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS_TABLE)?;
        let fields = match table.get((path.as_str(), id))? {
            Some(guard) => decode(guard.value())?,
            None => return Ok(None),
        };
        Ok(Some(Document {
            id: id.to_string(),
            fields,
        }))
    }

    async fn create(&self, path: &CollectionPath, fields: Fields) -> StoreResult<String> {
        let id = new_document_id();
        self.write(&[path], |table| put(table, path, &id, fields))?;
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> StoreResult<()> {
        self.write(&[path], |table| put(table, path, id, fields))
    }

    async fn update(&self, path: &CollectionPath, id: &str, partial: Fields) -> StoreResult<()> {
        self.write(&[path], |table| {
            let existing = table
                .get((path.as_str(), id))?
                .map(|guard| decode(guard.value()))
                .transpose()?;
            let mut fields = existing.ok_or_else(|| StoreError::not_found(path, id))?;
            fields.extend(strip_id(partial));
            put(table, path, id, fields)
        })
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        self.write(&[path], |table| {
            table.remove((path.as_str(), id))?;
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
        self.write(&[from, to], |table| {
            let removed = table.remove((from.as_str(), id))?.is_some();
            if !removed {
                return Err(StoreError::not_found(from, id));
            }
            put(table, to, id, fields)
        })
    }

    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<Subscription> {
        let mut senders = self.watchers.lock();
        attach(&mut senders, path, || {
            Ok(Arc::new(self.read_collection(path)?))
        })
    }
}
