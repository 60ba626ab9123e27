//! Neighbor Service - directed neighbor relation workflow
//!
//! Reads resolve a country's neighbor ids to full country records. Writes
//! validate each proposed neighbor independently and commit the ones that pass,
//! so a batch can partially succeed.
//!
//! # Addition rules
//!
//! 1. The source country must exist, otherwise the whole call fails with
//!    `ServiceError::NotFound` and nothing is processed
//! 2. The set of valid country ids is fetched once per call
//! 3. Each proposed id is then checked in order:
//!    - unknown id -> `invalid neighbor country id: <id>`
//!    - same as the source -> `country <id> cannot be its own neighbor`
//!    - relation already stored -> `neighbor <id> already exists for this country`
//!    - otherwise the relation is written
//!
//! A store failure while checking or writing one element is recorded as that
//! element's rejection and the remaining elements are still processed.
//!
//! Relations are directed: adding `(A, B)` never writes `(B, A)`.
//!
//! # Concurrency
//!
//! The duplicate check and the write are not atomic. Two concurrent calls for
//! the same pair can both pass the check; the second write overwrites the
//! first with identical content.

use crate::models::NeighborCountry;
use crate::repositories::{CountryRepository, NeighborRepository};
use crate::services::ServiceError;
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

/// Result of validating and applying one proposed neighbor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborOutcome {
    Added(String),
    Rejected { id: String, reason: String },
}

/// Whether a batch addition changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionStatus {
    /// At least one relation was written
    Applied,
    /// Every proposed neighbor was rejected
    NothingAdded,
}

/// Partitioned outcome of a batch addition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborAddition {
    pub added: Vec<String>,
    pub errors: Vec<String>,
}

impl NeighborAddition {
    pub fn status(&self) -> AdditionStatus {
        if self.added.is_empty() {
            AdditionStatus::NothingAdded
        } else {
            AdditionStatus::Applied
        }
    }
}

impl FromIterator<NeighborOutcome> for NeighborAddition {
    fn from_iter<I: IntoIterator<Item = NeighborOutcome>>(iter: I) -> Self {
        iter.into_iter()
            .fold(NeighborAddition::default(), |mut acc, outcome| {
                match outcome {
                    NeighborOutcome::Added(id) => acc.added.push(id),
                    NeighborOutcome::Rejected { reason, .. } => acc.errors.push(reason),
                }
                acc
            })
    }
}

#[derive(Clone)]
pub struct NeighborService {
    countries: CountryRepository,
    neighbors: NeighborRepository,
}

impl NeighborService {
    pub fn new(countries: CountryRepository, neighbors: NeighborRepository) -> Self {
        Self {
            countries,
            neighbors,
        }
    }

    /// Neighbors of `country_id`, projected to their public shape.
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound` if `country_id` itself does not exist
    /// - `ServiceError::DanglingNeighbor` if a stored relation points at a
    ///   country that no longer exists
    /// - `ServiceError::Storage` on store failures
    #[instrument(skip(self))]
    pub async fn get_neighbors(
        &self,
        country_id: &str,
    ) -> Result<Vec<NeighborCountry>, ServiceError> {
        self.countries.get_by_id(country_id).await?;

        let neighbor_ids = self.neighbors.list_by_country(country_id).await?;
        let mut neighbors = Vec::with_capacity(neighbor_ids.len());
        for neighbor_id in neighbor_ids {
            let Some(country) = self.countries.find_by_id(&neighbor_id).await? else {
                error!(
                    "❌ Relation {} -> {} points at a missing country",
                    country_id, neighbor_id
                );
                return Err(ServiceError::dangling_neighbor(country_id, neighbor_id));
            };
            neighbors.push(NeighborCountry::from(country));
        }

        Ok(neighbors)
    }

    /// Validate and add each proposed neighbor of `country_id`.
    ///
    /// Per-element problems, including a failed read or write for that
    /// element, are reported in the returned [`NeighborAddition::errors`] and
    /// never abort the remaining elements.
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound` if `country_id` does not exist (nothing is processed)
    /// - `ServiceError::Storage` if the source lookup or the id scan fails
    #[instrument(skip(self, proposed), fields(proposed = proposed.len()))]
    pub async fn add_neighbors(
        &self,
        country_id: &str,
        proposed: &[String],
    ) -> Result<NeighborAddition, ServiceError> {
        self.countries.get_by_id(country_id).await?;

        let known: HashSet<String> = self.countries.get_all_ids().await?.into_iter().collect();

        let mut outcomes = Vec::with_capacity(proposed.len());
        for neighbor_id in proposed {
            let outcome = match self.apply_one(country_id, neighbor_id, &known).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("❌ Failed to add neighbor {} for {}: {}", neighbor_id, country_id, e);
                    NeighborOutcome::Rejected {
                        id: neighbor_id.clone(),
                        reason: format!("failed to add neighbor {neighbor_id}: {e}"),
                    }
                }
            };
            if let NeighborOutcome::Rejected { id, reason } = &outcome {
                warn!("⚠️  Rejected neighbor {} for {}: {}", id, country_id, reason);
            }
            outcomes.push(outcome);
        }

        let addition: NeighborAddition = outcomes.into_iter().collect();
        info!(
            "Neighbors for {}: {} added, {} rejected",
            country_id,
            addition.added.len(),
            addition.errors.len()
        );
        Ok(addition)
    }

    /// Check one proposed neighbor and write it if it passes. `Err` only for
    /// store failures on this element.
    async fn apply_one(
        &self,
        country_id: &str,
        neighbor_id: &str,
        known: &HashSet<String>,
    ) -> Result<NeighborOutcome, ServiceError> {
        let reject = |reason: String| NeighborOutcome::Rejected {
            id: neighbor_id.to_string(),
            reason,
        };

        if !known.contains(neighbor_id) {
            return Ok(reject(format!("invalid neighbor country id: {neighbor_id}")));
        }
        if neighbor_id == country_id {
            return Ok(reject(format!("country {neighbor_id} cannot be its own neighbor")));
        }
        if self.neighbors.get(country_id, neighbor_id).await?.is_some() {
            return Ok(reject(format!(
                "neighbor {neighbor_id} already exists for this country"
            )));
        }

        self.neighbors.add(country_id, neighbor_id).await?;
        Ok(NeighborOutcome::Added(neighbor_id.to_string()))
    }

    /// Remove the directed relation `(country_id -> neighbor_id)`.
    ///
    /// # Errors
    ///
    /// - `ServiceError::NotFound` if `country_id` does not exist or the
    ///   relation is not stored (the id reported is the missing one)
    pub async fn remove_neighbor(
        &self,
        country_id: &str,
        neighbor_id: &str,
    ) -> Result<(), ServiceError> {
        self.countries.get_by_id(country_id).await?;

        if !self.neighbors.remove(country_id, neighbor_id).await? {
            return Err(ServiceError::not_found(format!("{country_id} -> {neighbor_id}")));
        }
        info!("Removed neighbor {} from {}", neighbor_id, country_id);
        Ok(())
    }
}
