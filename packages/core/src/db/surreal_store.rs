//! SurrealStore - RecordStore Implementation for SurrealDB Backend
//!
//! Each collection maps to one SCHEMALESS SurrealDB table. A record is stored
//! as `{ pk, sk, doc }` under the array record id `[pk, sk]`, so compound keys
//! stay unique without string escaping and partition queries filter on `pk`.
//!
//! # Engines
//!
//! - `SurrealStore::new(path)` - embedded RocksDB (`kv-rocksdb`)
//! - `SurrealStore::new_in_memory()` - in-memory engine (`kv-mem`)
//!
//! # Examples
//!
//! ```rust,no_run
//! use atlas_core::db::{RecordKey, RecordStore, SurrealStore};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SurrealStore::new(PathBuf::from("./data/atlas.db")).await?;
//!     let country = store.get("countries", &RecordKey::single("c-1")).await?;
//!     println!("{:?}", country);
//!     Ok(())
//! }
//! ```

use crate::db::{RecordKey, RecordStore, ScanFilter, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

/// Row layout inside every collection table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    pk: String,
    sk: Option<String>,
    doc: Value,
}

fn record_id(key: &RecordKey) -> Vec<String> {
    vec![key.partition.clone(), key.sort.clone().unwrap_or_default()]
}

fn rejected(operation: &'static str, collection: &str, err: surrealdb::Error) -> StoreError {
    tracing::error!("❌ SurrealDB {} on '{}' failed: {}", operation, collection, err);
    StoreError::rejected(operation, collection, err.to_string())
}

/// SurrealStore implements RecordStore for the embedded SurrealDB backend
pub struct SurrealStore {
    db: Arc<Surreal<Db>>,
}

impl SurrealStore {
    /// Open (or create) an embedded RocksDB database at `db_path`
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .context("Failed to initialize SurrealDB with RocksDB backend")?;
        Self::select_namespace(db).await
    }

    /// In-memory SurrealDB instance; contents are lost on drop
    pub async fn new_in_memory() -> Result<Self> {
        let db = Surreal::new::<Mem>(())
            .await
            .context("Failed to initialize in-memory SurrealDB")?;
        Self::select_namespace(db).await
    }

    async fn select_namespace(db: Surreal<Db>) -> Result<Self> {
        db.use_ns("atlas")
            .use_db("records")
            .await
            .context("Failed to set namespace/database")?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn select_rows(
        &self,
        operation: &'static str,
        collection: &str,
        sql: &str,
        partition: Option<&str>,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let mut query = self
            .db
            .query(sql)
            .bind(("table", collection.to_string()));
        if let Some(pk) = partition {
            query = query.bind(("pk", pk.to_string()));
        }

        let mut response = query.await.map_err(|e| rejected(operation, collection, e))?;
        response.take(0).map_err(|e| rejected(operation, collection, e))
    }
}

#[async_trait]
impl RecordStore for SurrealStore {
    async fn get(&self, collection: &str, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let mut response = self
            .db
            .query("SELECT pk, sk, doc FROM type::thing($table, $rid);")
            .bind(("table", collection.to_string()))
            .bind(("rid", record_id(key)))
            .await
            .map_err(|e| rejected("get", collection, e))?;

        let rows: Vec<StoredRecord> = response
            .take(0)
            .map_err(|e| rejected("get", collection, e))?;
        Ok(rows.into_iter().next().map(|row| row.doc))
    }

    async fn put(
        &self,
        collection: &str,
        key: RecordKey,
        document: Value,
    ) -> Result<(), StoreError> {
        let rid = record_id(&key);
        let row = StoredRecord {
            pk: key.partition,
            sk: key.sort,
            doc: document,
        };

        self.db
            .query("UPSERT type::thing($table, $rid) CONTENT $row;")
            .bind(("table", collection.to_string()))
            .bind(("rid", rid))
            .bind(("row", row))
            .await
            .and_then(|response| response.check())
            .map_err(|e| rejected("put", collection, e))?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &RecordKey) -> Result<bool, StoreError> {
        let mut response = self
            .db
            .query("DELETE type::thing($table, $rid) RETURN BEFORE;")
            .bind(("table", collection.to_string()))
            .bind(("rid", record_id(key)))
            .await
            .map_err(|e| rejected("delete", collection, e))?;

        let removed: Vec<StoredRecord> = response
            .take(0)
            .map_err(|e| rejected("delete", collection, e))?;
        Ok(!removed.is_empty())
    }

    async fn scan(&self, collection: &str, filter: &ScanFilter) -> Result<Vec<Value>, StoreError> {
        let rows = self
            .select_rows("scan", collection, "SELECT pk, sk, doc FROM type::table($table);", None)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| row.doc)
            .filter(|doc| filter.matches(doc))
            .collect())
    }

    async fn query_partition(
        &self,
        collection: &str,
        partition: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = self
            .select_rows(
                "query_partition",
                collection,
                "SELECT pk, sk, doc FROM type::table($table) WHERE pk = $pk;",
                Some(partition),
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.doc).collect())
    }

    async fn batch_put(
        &self,
        collection: &str,
        records: Vec<(RecordKey, Value)>,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..records.len() {
            sql.push_str(&format!(
                "UPSERT type::thing($table, $rid_{i}) CONTENT $row_{i};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .db
            .query(sql)
            .bind(("table", collection.to_string()));
        for (i, (key, document)) in records.into_iter().enumerate() {
            let rid = record_id(&key);
            let row = StoredRecord {
                pk: key.partition,
                sk: key.sort,
                doc: document,
            };
            query = query
                .bind((format!("rid_{i}"), rid))
                .bind((format!("row_{i}"), row));
        }

        query
            .await
            .and_then(|response| response.check())
            .map_err(|e| rejected("batch_put", collection, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_compound_keys_round_trip_through_partition_query() -> Result<()> {
        let store = SurrealStore::new_in_memory().await?;
        store
            .put("neighbors", RecordKey::compound("A", "B"), json!({ "neighborId": "B" }))
            .await?;
        store
            .put("neighbors", RecordKey::compound("B", "A"), json!({ "neighborId": "A" }))
            .await?;

        let rows = store.query_partition("neighbors", "A").await?;
        assert_eq!(rows, vec![json!({ "neighborId": "B" })]);

        let hit = store.get("neighbors", &RecordKey::compound("A", "B")).await?;
        assert!(hit.is_some());
        let miss = store.get("neighbors", &RecordKey::compound("A", "C")).await?;
        assert!(miss.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_put_and_filtered_scan() -> Result<()> {
        let store = SurrealStore::new_in_memory().await?;
        store
            .batch_put(
                "countries",
                vec![
                    (RecordKey::single("a"), json!({ "countryID": "a" })),
                    (RecordKey::single("b"), json!({ "countryID": "b" })),
                    (RecordKey::single("c"), json!({ "name": "orphan" })),
                ],
            )
            .await?;

        let all = store.scan("countries", &ScanFilter::All).await?;
        assert_eq!(all.len(), 3);
        let with_ids = store
            .scan("countries", &ScanFilter::HasField("countryID".to_string()))
            .await?;
        assert_eq!(with_ids.len(), 2);

        assert!(store.delete("countries", &RecordKey::single("c")).await?);
        assert!(!store.delete("countries", &RecordKey::single("c")).await?);
        Ok(())
    }
}
