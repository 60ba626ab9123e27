//! MemoryStore - in-process RecordStore backend
//!
//! Keeps every collection in a `BTreeMap` behind a mutex. Used as the default
//! backend for local runs and as the substitutable store in tests.
//!
//! Failure injection (`set_available`, `fail_next_writes`) lets tests drive
//! the storage-error paths of the repositories and services.

use crate::db::{RecordKey, RecordStore, ScanFilter, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type Collections = HashMap<String, BTreeMap<RecordKey, Value>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<Collections>>,
    unavailable: Arc<AtomicBool>,
    failing_writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `false`, every operation fails with `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Reject the next `count` write operations (`put`, `delete`, `batch_put`).
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Number of records currently stored in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("memory store marked unavailable"));
        }
        self.collections
            .lock()
            .map_err(|_| StoreError::unavailable("Failed to acquire lock"))
    }

    fn check_write(&self, operation: &'static str, collection: &str) -> Result<(), StoreError> {
        let rejected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(StoreError::rejected(
                operation,
                collection,
                "injected write failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let collections = self.lock()?;
        Ok(collections.get(collection).and_then(|c| c.get(key)).cloned())
    }

    async fn put(
        &self,
        collection: &str,
        key: RecordKey,
        document: Value,
    ) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        self.check_write("put", collection)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key, document);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<bool, StoreError> {
        let mut collections = self.lock()?;
        self.check_write("delete", collection)?;
        Ok(collections
            .get_mut(collection)
            .and_then(|c| c.remove(key))
            .is_some())
    }

    async fn scan(&self, collection: &str, filter: &ScanFilter) -> Result<Vec<Value>, StoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|c| c.values().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn query_partition(
        &self,
        collection: &str,
        partition: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .filter(|(key, _)| key.partition == partition)
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn batch_put(
        &self,
        collection: &str,
        records: Vec<(RecordKey, Value)>,
    ) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        self.check_write("batch_put", collection)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_overwrites_existing_record() {
        let store = MemoryStore::new();
        let key = RecordKey::single("c-1");

        store.put("countries", key.clone(), json!({ "v": 1 })).await.unwrap();
        store.put("countries", key.clone(), json!({ "v": 2 })).await.unwrap();

        assert_eq!(store.len("countries"), 1);
        assert_eq!(
            store.get("countries", &key).await.unwrap(),
            Some(json!({ "v": 2 }))
        );
    }

    #[tokio::test]
    async fn test_query_partition_only_returns_matching_partition() {
        let store = MemoryStore::new();
        store
            .put("neighbors", RecordKey::compound("A", "B"), json!({ "neighborId": "B" }))
            .await
            .unwrap();
        store
            .put("neighbors", RecordKey::compound("A", "C"), json!({ "neighborId": "C" }))
            .await
            .unwrap();
        store
            .put("neighbors", RecordKey::compound("B", "A"), json!({ "neighborId": "A" }))
            .await
            .unwrap();

        let rows = store.query_partition("neighbors", "A").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(store.query_partition("neighbors", "Z").await.unwrap().is_empty());
        assert!(store.query_partition("missing", "A").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_put_writes_nothing() {
        let store = MemoryStore::new();
        store.fail_next_writes(1);

        let records = vec![
            (RecordKey::single("a"), json!({})),
            (RecordKey::single("b"), json!({})),
        ];
        let err = store.batch_put("countries", records.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { operation: "batch_put", .. }));
        assert!(store.is_empty("countries"));

        // Injection is consumed; the retry goes through
        store.batch_put("countries", records).await.unwrap();
        assert_eq!(store.len("countries"), 2);
    }

    #[test]
    fn test_unavailable_store_fails_reads() {
        let store = MemoryStore::new();
        store.set_available(false);

        let result = tokio_test::block_on(store.scan("countries", &ScanFilter::All));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        store.set_available(true);
        let result = tokio_test::block_on(store.scan("countries", &ScanFilter::All));
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_record_existed() {
        let store = MemoryStore::new();
        let key = RecordKey::compound("A", "B");
        store.put("neighbors", key.clone(), json!({})).await.unwrap();

        assert!(store.delete("neighbors", &key).await.unwrap());
        assert!(!store.delete("neighbors", &key).await.unwrap());
    }
}
