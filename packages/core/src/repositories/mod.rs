//! Repositories
//!
//! Typed wrappers over the [`RecordStore`](crate::db::RecordStore), one per
//! collection. Each repository owns its collection name and key scheme:
//!
//! - `CountryRepository` - `countries`, keyed by `countryID`
//! - `NeighborRepository` - `neighbors`, partitioned by `countryID`, sorted by `neighborId`

mod country_repository;
mod neighbor_repository;

pub use country_repository::{CountryRepository, COUNTRY_COLLECTION};
pub use neighbor_repository::{NeighborRepository, NEIGHBOR_COLLECTION};
