//! Record Store Error Types
//!
//! This module defines error types for record store operations, covering
//! unreachable backends, rejected operations and document (de)serialization.

use thiserror::Error;

/// Record store operation errors
///
/// Service-layer code converts these into `ServiceError::Storage`; they are
/// never reported to callers as "not found" or validation failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not be reached (connection lost, lock poisoned, ...)
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// Backend was reachable but refused the operation
    #[error("Record store rejected {operation} on '{collection}': {reason}")]
    Rejected {
        operation: &'static str,
        collection: String,
        reason: String,
    },

    /// Stored document does not match the expected shape
    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a rejected-operation error
    pub fn rejected(
        operation: &'static str,
        collection: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            operation,
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
