use crate::db::{RecordKey, RecordStore};
use crate::models::NeighborRelation;
use crate::services::ServiceError;
use std::sync::Arc;

pub const NEIGHBOR_COLLECTION: &str = "neighbors";

/// Neighbor relation persistence.
///
/// Compound key: partition = source `countryID`, sort = `neighborId`. The
/// repository does not enforce idempotence beyond the store's overwrite
/// semantics; callers check for duplicates first.
#[derive(Clone)]
pub struct NeighborRepository {
    store: Arc<dyn RecordStore>,
}

impl NeighborRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Existence check on the full key; `Ok(None)` when the relation is absent
    pub async fn get(
        &self,
        country_id: &str,
        neighbor_id: &str,
    ) -> Result<Option<NeighborRelation>, ServiceError> {
        let document = self
            .store
            .get(NEIGHBOR_COLLECTION, &RecordKey::compound(country_id, neighbor_id))
            .await?;

        Ok(document.map(serde_json::from_value).transpose()?)
    }

    /// Neighbor ids recorded for `country_id`; empty when there are none
    pub async fn list_by_country(&self, country_id: &str) -> Result<Vec<String>, ServiceError> {
        let documents = self
            .store
            .query_partition(NEIGHBOR_COLLECTION, country_id)
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value::<NeighborRelation>(doc)
                    .map(|relation| relation.neighbor_id)
                    .map_err(ServiceError::from)
            })
            .collect()
    }

    /// Unconditional write of `(country_id -> neighbor_id)`
    pub async fn add(&self, country_id: &str, neighbor_id: &str) -> Result<(), ServiceError> {
        let relation = NeighborRelation::new(country_id, neighbor_id);
        self.store
            .put(
                NEIGHBOR_COLLECTION,
                RecordKey::compound(country_id, neighbor_id),
                serde_json::to_value(&relation)?,
            )
            .await?;
        Ok(())
    }

    /// Remove `(country_id -> neighbor_id)`. Returns `false` if it did not exist.
    pub async fn remove(&self, country_id: &str, neighbor_id: &str) -> Result<bool, ServiceError> {
        Ok(self
            .store
            .delete(NEIGHBOR_COLLECTION, &RecordKey::compound(country_id, neighbor_id))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn repo() -> NeighborRepository {
        NeighborRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_relations_are_directed() {
        let repo = repo();
        repo.add("A", "B").await.unwrap();

        assert_eq!(
            repo.get("A", "B").await.unwrap(),
            Some(NeighborRelation::new("A", "B"))
        );
        assert!(repo.get("B", "A").await.unwrap().is_none());
        assert!(repo.list_by_country("B").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_country_returns_neighbor_ids() {
        let repo = repo();
        repo.add("A", "B").await.unwrap();
        repo.add("A", "C").await.unwrap();
        repo.add("A", "B").await.unwrap();

        let mut ids = repo.list_by_country("A").await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["B".to_string(), "C".to_string()]);
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = repo();
        repo.add("A", "B").await.unwrap();

        assert!(repo.remove("A", "B").await.unwrap());
        assert!(!repo.remove("A", "B").await.unwrap());
        assert!(repo.get("A", "B").await.unwrap().is_none());
    }
}
