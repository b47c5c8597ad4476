// src/repositories/memory_document_store.rs
//
// In-process document store
//
// Used as the local backend and as the store double in tests. Writes are
// serialized; after each write the affected collection's full snapshot is
// published on the event bus before the next write may start, so
// subscribers see snapshots in write order.
//
// Subscriber callbacks run synchronously inside the write and must not
// write back into the store from the same call stack.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::error::AppResult;
use crate::events::{CollectionChanged, EventBus, Subscription};
use crate::repositories::document_store::{
    CollectionPath, Document, DocumentPath, DocumentStore, Fields, SnapshotCallback,
};

type Collections = BTreeMap<String, BTreeMap<String, Fields>>;

pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
    write_order: Mutex<()>,
    event_bus: Arc<EventBus>,
}

impl MemoryDocumentStore {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            write_order: Mutex::new(()),
            event_bus,
        }
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn publish(&self, collection: &CollectionPath) {
        let documents = self.snapshot(collection.as_str());
        self.event_bus
            .emit(CollectionChanged::new(collection.as_str().to_string(), documents));
    }

    /// Number of documents across all collections
    pub fn document_count(&self) -> usize {
        self.collections.read().values().map(BTreeMap::len).sum()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn write_merge(&self, path: &DocumentPath, fields: Fields) -> AppResult<()> {
        let _order = self.write_order.lock();

        {
            let mut collections = self.collections.write();
            let existing = collections
                .entry(path.collection().as_str().to_string())
                .or_default()
                .entry(path.id().to_string())
                .or_default();

            for (key, value) in fields {
                existing.insert(key, value);
            }
        }

        self.publish(path.collection());
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> AppResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(path.collection().as_str())
            .and_then(|docs| docs.get(path.id()))
            .map(|fields| Document::new(path.id(), fields.clone())))
    }

    async fn delete(&self, path: &DocumentPath) -> AppResult<bool> {
        let _order = self.write_order.lock();

        let removed = {
            let mut collections = self.collections.write();
            collections
                .get_mut(path.collection().as_str())
                .and_then(|docs| docs.remove(path.id()))
                .is_some()
        };

        // No change, no snapshot
        if removed {
            self.publish(path.collection());
        }

        Ok(removed)
    }

    async fn list_children(&self, collection: &CollectionPath) -> AppResult<Vec<Document>> {
        Ok(self.snapshot(collection.as_str()))
    }

    fn subscribe_collection(
        &self,
        collection: &CollectionPath,
        callback: SnapshotCallback,
    ) -> Subscription {
        let callback: Arc<dyn Fn(AppResult<Vec<Document>>) + Send + Sync> = Arc::from(callback);

        // Holding the write order lock keeps a concurrent write from slipping
        // between the initial snapshot and the registration.
        let _order = self.write_order.lock();

        let target = collection.as_str().to_string();
        let listener = Arc::clone(&callback);
        let subscription = self.event_bus.subscribe::<CollectionChanged, _>(move |event| {
            if event.collection == target {
                listener(Ok(event.documents.clone()));
            }
        });

        callback(Ok(self.snapshot(collection.as_str())));

        subscription
    }
}
