//! Data Models
//!
//! This module contains the data structures used throughout Atlas:
//!
//! - `Country` - Stored country record, keyed by `countryID`
//! - `CountryDraft` - Unvalidated country input from callers
//! - `NeighborRelation` - Directed `(countryID, neighborId)` edge
//! - `NeighborCountry` - Public projection returned by neighbor lookups

mod country;

pub use country::{Country, CountryDraft, NeighborCountry, NeighborRelation, ValidationError};
