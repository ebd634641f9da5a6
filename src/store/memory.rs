use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{Document, DocumentStore, JsonMap, StoreError};

/// In-process document store used for local runs and tests.
///
/// Reads and writes can be switched to fail so callers can exercise the
/// transport-error paths, and writes can be slowed down to observe an
/// update that is still in flight.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, HashMap<String, JsonMap>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a document. `data` must be a JSON object.
    pub fn insert(&self, collection: &str, id: &str, data: JsonValue) {
        let body = match data {
            JsonValue::Object(map) => map,
            other => {
                let mut map = JsonMap::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        let mut guard = self.collections.lock().expect("memory store mutex poisoned");
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), body);
    }

    pub fn remove(&self, collection: &str, id: &str) -> Option<JsonMap> {
        let mut guard = self.collections.lock().expect("memory store mutex poisoned");
        guard.get_mut(collection).and_then(|docs| docs.remove(id))
    }

    /// Current body of a document, bypassing failure injection.
    pub fn snapshot(&self, collection: &str, id: &str) -> Option<JsonMap> {
        let guard = self.collections.lock().expect("memory store mutex poisoned");
        guard.get(collection).and_then(|docs| docs.get(id)).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *self.write_delay.lock().expect("memory store mutex poisoned") = delay;
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("memory store reads disabled".to_string()));
        }

        let guard = self.collections.lock().expect("memory store mutex poisoned");
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(collection, id, data.clone())))
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let delay = *self.write_delay.lock().expect("memory store mutex poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("memory store writes disabled".to_string()));
        }

        let mut guard = self.collections.lock().expect("memory store mutex poisoned");
        let doc = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }
}
