use crate::db::{RecordKey, RecordStore, ScanFilter, StoreError};
use crate::models::{Country, CountryDraft, ValidationError};
use crate::services::ServiceError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub const COUNTRY_COLLECTION: &str = "countries";

/// Country persistence over a single-key collection (`countryID`)
#[derive(Clone)]
pub struct CountryRepository {
    store: Arc<dyn RecordStore>,
}

impl CountryRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a batch of countries.
    ///
    /// Every element gets a fresh UUID v4 regardless of input. Validation is
    /// all-or-nothing: the first invalid draft fails the call before anything
    /// is written. The write itself is a single `batch_put`.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` for an empty batch or a missing required field
    /// - `ServiceError::Storage` if the batch write fails
    #[instrument(skip(self, drafts), fields(count = drafts.len()))]
    pub async fn create(&self, drafts: Vec<CountryDraft>) -> Result<Vec<Country>, ServiceError> {
        if drafts.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let countries = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| draft.into_country(index, Uuid::new_v4().to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        let records = countries
            .iter()
            .map(|c| Ok((RecordKey::single(&c.country_id), serde_json::to_value(c)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;

        self.store.batch_put(COUNTRY_COLLECTION, records).await?;

        info!("✅ Created {} countries", countries.len());
        Ok(countries)
    }

    /// Point lookup; `Ok(None)` when the country does not exist
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Country>, ServiceError> {
        let document = self
            .store
            .get(COUNTRY_COLLECTION, &RecordKey::single(id))
            .await?;

        Ok(document.map(serde_json::from_value).transpose()?)
    }

    /// Point lookup failing with `ServiceError::NotFound` when absent
    pub async fn get_by_id(&self, id: &str) -> Result<Country, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))
    }

    /// Full snapshot of the collection. No server-side limit applies.
    pub async fn get_all(&self) -> Result<Vec<Country>, ServiceError> {
        let documents = self.store.scan(COUNTRY_COLLECTION, &ScanFilter::All).await?;
        debug!("Scanned {} country records", documents.len());

        documents
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(ServiceError::from))
            .collect()
    }

    /// Identifiers of every stored country
    pub async fn get_all_ids(&self) -> Result<Vec<String>, ServiceError> {
        let documents = self
            .store
            .scan(
                COUNTRY_COLLECTION,
                &ScanFilter::HasField("countryID".to_string()),
            )
            .await?;

        Ok(documents
            .iter()
            .filter_map(|doc| doc.get("countryID").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}
