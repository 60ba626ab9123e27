//! Service Layer Error Types
//!
//! This module defines the error taxonomy shared by repositories and services.
//! The HTTP layer maps each variant to a status code; nothing here knows
//! about HTTP.

use crate::db::StoreError;
use crate::models::ValidationError;
use thiserror::Error;

/// Repository and service operation errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or incomplete caller input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced country does not exist
    #[error("Country not found: {id}")]
    NotFound { id: String },

    /// A stored neighbor relation points at a country that no longer exists.
    ///
    /// This is a broken repository invariant, not a bad request.
    #[error("Neighbor relation {country_id} -> {neighbor_id} references a missing country")]
    DanglingNeighbor {
        country_id: String,
        neighbor_id: String,
    },

    /// Record store unreachable or refused the operation
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StoreError),
}

impl ServiceError {
    /// Create a country not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a dangling neighbor error
    pub fn dangling_neighbor(
        country_id: impl Into<String>,
        neighbor_id: impl Into<String>,
    ) -> Self {
        Self::DanglingNeighbor {
            country_id: country_id.into(),
            neighbor_id: neighbor_id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StoreError::from(err))
    }
}
