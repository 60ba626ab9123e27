//! Database Layer
//!
//! This module handles all record store interactions:
//!
//! - `RecordStore` - async key-value/document store contract
//! - `MemoryStore` - in-process backend (default, and the test double)
//! - `SurrealStore` - embedded SurrealDB backend (`surrealdb` feature)
//!
//! Repositories receive the store as an explicitly constructed
//! `Arc<dyn RecordStore>`; nothing in this crate holds a global client.

mod error;
mod memory_store;
mod record_store;
#[cfg(feature = "surrealdb")]
mod surreal_store;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use record_store::{RecordKey, RecordStore, ScanFilter};
#[cfg(feature = "surrealdb")]
pub use surreal_store::SurrealStore;
