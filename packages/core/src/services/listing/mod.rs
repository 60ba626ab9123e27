//! Country Listing - search, sort and paginate the country collection
//!
//! Listing works on a full snapshot of the `countries` collection: one scan,
//! then filtering, ordering and windowing in memory. There is no streaming or
//! incremental read, so memory use grows with the collection. Results reflect
//! whatever the scan observed; paging across calls is not stable while the
//! collection changes.
//!
//! # Input normalisation
//!
//! Query-string values never fail a listing request:
//!
//! - `page` / `limit` that are missing, non-numeric or zero fall back to
//!   `1` / `10`
//! - unknown `sort_by` values fall back to `a_to_z`
//! - blank `search` is treated as absent
//!
//! # Ordering
//!
//! Names compare lexicographically, population and area numerically. A
//! country without the sort field orders below every country that has it, so
//! it comes first ascending and last descending. Sorting is stable.
//!
//! # Examples
//!
//! ```rust
//! use atlas_core::services::listing::{paginate, ListQuery, SortOption};
//!
//! let query = ListQuery::from_raw(Some("2"), Some("abc"), Some("z_to_a"), None);
//! assert_eq!(query.page, 2);
//! assert_eq!(query.limit, 10);
//! assert_eq!(query.sort_by, SortOption::ZToA);
//!
//! let page = paginate(Vec::new(), &query);
//! assert_eq!(page.total, 0);
//! assert!(page.items.is_empty());
//! ```

use crate::models::Country;
use crate::repositories::CountryRepository;
use crate::services::ServiceError;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, instrument};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Population,
    Area,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Named orderings accepted in the `sort_by` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    AToZ,
    ZToA,
    PopulationHighToLow,
    PopulationLowToHigh,
    AreaHighToLow,
    AreaLowToHigh,
}

impl SortOption {
    pub fn resolve(self) -> (SortField, SortDirection) {
        match self {
            SortOption::AToZ => (SortField::Name, SortDirection::Ascending),
            SortOption::ZToA => (SortField::Name, SortDirection::Descending),
            SortOption::PopulationHighToLow => (SortField::Population, SortDirection::Descending),
            SortOption::PopulationLowToHigh => (SortField::Population, SortDirection::Ascending),
            SortOption::AreaHighToLow => (SortField::Area, SortDirection::Descending),
            SortOption::AreaLowToHigh => (SortField::Area, SortDirection::Ascending),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::AToZ => "a_to_z",
            SortOption::ZToA => "z_to_a",
            SortOption::PopulationHighToLow => "population_high_to_low",
            SortOption::PopulationLowToHigh => "population_low_to_high",
            SortOption::AreaHighToLow => "area_high_to_low",
            SortOption::AreaLowToHigh => "area_low_to_high",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a_to_z" => Ok(SortOption::AToZ),
            "z_to_a" => Ok(SortOption::ZToA),
            "population_high_to_low" => Ok(SortOption::PopulationHighToLow),
            "population_low_to_high" => Ok(SortOption::PopulationLowToHigh),
            "area_high_to_low" => Ok(SortOption::AreaHighToLow),
            "area_low_to_high" => Ok(SortOption::AreaLowToHigh),
            other => Err(format!("unknown sort option: {other}")),
        }
    }
}

/// Normalised listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub sort_by: SortOption,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortOption::default(),
            search: None,
        }
    }
}

impl ListQuery {
    /// Build a query from raw query-string values, applying the fallback
    /// policy described in the module docs.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        sort_by: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        let sort_by = sort_by
            .map(|raw| {
                raw.trim().parse().unwrap_or_else(|_| {
                    debug!("Unknown sort_by '{}', using a_to_z", raw);
                    SortOption::default()
                })
            })
            .unwrap_or_default();

        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
            sort_by,
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    match raw.map(|r| r.trim().parse::<usize>()) {
        Some(Ok(n)) if n > 0 => n,
        None => default,
        _ => {
            debug!("Unusable pagination value {:?}, using {}", raw, default);
            default
        }
    }
}

/// One window of the listing plus paging metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPage {
    #[serde(rename = "list")]
    pub items: Vec<Country>,
    pub has_next: bool,
    pub has_prev: bool,
    pub page: usize,
    pub pages: usize,
    pub per_page: usize,
    pub total: usize,
}

/// Filter, sort and window `countries` according to `query`.
///
/// Pure: no I/O, no logging of record contents. `page` beyond `pages` yields
/// an empty window rather than an error.
pub fn paginate(countries: Vec<Country>, query: &ListQuery) -> CountryPage {
    let page = query.page.max(1);
    let limit = query.limit.max(1);

    let mut matching: Vec<Country> = match query.search.as_deref() {
        Some(search) => {
            let needle = search.to_lowercase();
            countries
                .into_iter()
                .filter(|country| matches_search(country, &needle))
                .collect()
        }
        None => countries,
    };

    sort_countries(&mut matching, query.sort_by);

    let total = matching.len();
    let pages = total.div_ceil(limit);
    let offset = (page - 1).saturating_mul(limit);
    let items = matching.into_iter().skip(offset).take(limit).collect();

    CountryPage {
        items,
        has_next: page < pages,
        has_prev: page > 1,
        page,
        pages,
        per_page: limit,
        total,
    }
}

/// Case-insensitive literal substring match on name, region and subregion.
/// `needle` must already be lowercased.
fn matches_search(country: &Country, needle: &str) -> bool {
    country.name.to_lowercase().contains(needle)
        || country.region.to_lowercase().contains(needle)
        || country
            .subregion
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(needle))
}

pub fn sort_countries(countries: &mut [Country], sort_by: SortOption) {
    let (field, direction) = sort_by.resolve();
    countries.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Total order on one field; absent values order below present ones
fn compare_by_field(a: &Country, b: &Country, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Population => compare_numeric(a.population, b.population),
        SortField::Area => compare_numeric(a.area, b.area),
    }
}

fn compare_numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Listing entry point: one snapshot read, then [`paginate`]
#[derive(Clone)]
pub struct CountryListingService {
    countries: CountryRepository,
}

impl CountryListingService {
    pub fn new(countries: CountryRepository) -> Self {
        Self { countries }
    }

    /// # Errors
    ///
    /// Only `ServiceError::Storage`, passed through from the snapshot read.
    #[instrument(
        skip(self),
        fields(page = query.page, limit = query.limit, sort_by = query.sort_by.as_str())
    )]
    pub async fn list(&self, query: &ListQuery) -> Result<CountryPage, ServiceError> {
        let snapshot = self.countries.get_all().await?;
        let page = paginate(snapshot, query);

        debug!(
            "Listed {} of {} countries (page {}/{})",
            page.items.len(),
            page.total,
            page.page,
            page.pages
        );
        Ok(page)
    }
}
