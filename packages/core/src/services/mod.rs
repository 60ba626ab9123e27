//! Business Services
//!
//! This module contains the business logic built on the repositories:
//!
//! - `CountryListingService` - search, sort and paginate countries
//! - `NeighborService` - resolve and add directed neighbor relations
//!
//! Plain country creation and lookup go straight to
//! [`CountryRepository`](crate::repositories::CountryRepository).

pub mod error;
pub mod listing;
pub mod neighbor_service;

pub use error::ServiceError;
pub use listing::{CountryListingService, CountryPage, ListQuery, SortOption};
pub use neighbor_service::{AdditionStatus, NeighborAddition, NeighborOutcome, NeighborService};
