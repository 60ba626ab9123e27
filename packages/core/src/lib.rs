//! Atlas Core Business Logic Layer
//!
//! This crate provides the data management and service logic for the Atlas
//! country service: countries, directed neighbor relations between them, and
//! the record store they live in.
//!
//! # Architecture
//!
//! - **Record store**: async key-value/document contract with an in-memory
//!   backend and an optional embedded SurrealDB backend
//! - **Repositories**: typed access per collection, owning the key scheme
//! - **Services**: listing (search/sort/paginate) and neighbor management
//!
//! # Modules
//!
//! - [`models`] - Data structures (Country, NeighborRelation, ...)
//! - [`db`] - Record store trait and backends
//! - [`repositories`] - Country and neighbor repositories
//! - [`services`] - Listing and neighbor services, error taxonomy

pub mod db;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
