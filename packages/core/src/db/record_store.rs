//! RecordStore Trait - Storage Abstraction Layer
//!
//! This module defines the `RecordStore` trait that abstracts the key-value /
//! document store behind the country and neighbor repositories. The trait
//! enables multiple backend implementations (in-memory, embedded SurrealDB)
//! without changing repository or service logic.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async so embedded and networked
//!    backends share one contract
//! 2. **Documents**: Records are `serde_json::Value` documents; repositories
//!    own their key scheme and (de)serialization
//! 3. **Injected**: Backends are constructed once at startup and passed to each
//!    repository as `Arc<dyn RecordStore>`; there is no global client
//! 4. **Consistency**: Read-after-write per key at best. `scan` and
//!    `query_partition` return records in no guaranteed order
//!
//! # Examples
//!
//! ```rust,no_run
//! use atlas_core::db::{MemoryStore, RecordKey, RecordStore};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), atlas_core::db::StoreError> {
//! let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
//! store
//!     .put("countries", RecordKey::single("c-1"), json!({ "countryID": "c-1" }))
//!     .await?;
//! let found = store.get("countries", &RecordKey::single("c-1")).await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

use crate::db::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// Address of a record inside a collection.
///
/// Single-key collections only use `partition`. Compound-key collections use
/// `partition` plus `sort`; records sharing a partition can be fetched
/// together with [`RecordStore::query_partition`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub partition: String,
    pub sort: Option<String>,
}

impl RecordKey {
    pub fn single(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    pub fn compound(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

/// Filter applied during a full-collection scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFilter {
    /// Every record in the collection
    All,
    /// Records carrying a non-null value under the named top-level field
    HasField(String),
}

impl ScanFilter {
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            ScanFilter::All => true,
            ScanFilter::HasField(field) => document.get(field).is_some_and(|v| !v.is_null()),
        }
    }
}

/// Abstraction layer for record persistence
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// across request handlers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Point lookup. Returns `Ok(None)` when no record exists (not an error).
    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Value>, StoreError>;

    /// Unconditional write; replaces any record already stored under `key`.
    async fn put(&self, collection: &str, key: RecordKey, document: Value)
        -> Result<(), StoreError>;

    /// Remove a record. Returns `true` when a record was removed.
    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<bool, StoreError>;

    /// Full-collection scan. May be arbitrarily large; order is unspecified.
    async fn scan(&self, collection: &str, filter: &ScanFilter) -> Result<Vec<Value>, StoreError>;

    /// All records whose key shares `partition`. Empty when there are none.
    async fn query_partition(
        &self,
        collection: &str,
        partition: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Write many records at once, atomically where the backend supports it.
    async fn batch_put(
        &self,
        collection: &str,
        records: Vec<(RecordKey, Value)>,
    ) -> Result<(), StoreError>;
}
