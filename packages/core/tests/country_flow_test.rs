//! Integration tests for the country and neighbor services
//!
//! Tests cover:
//! - Batch creation followed by listing through the public API
//! - Directed neighbor relations across services sharing one store
//! - Storage failures surfacing as `ServiceError::Storage`

use atlas_core::db::{MemoryStore, RecordStore};
use atlas_core::repositories::{CountryRepository, NeighborRepository};
use atlas_core::{
    AdditionStatus, CountryDraft, CountryListingService, ListQuery, NeighborService, ServiceError,
    SortOption,
};
use serde_json::json;
use std::sync::Arc;

struct Services {
    store: MemoryStore,
    countries: CountryRepository,
    listing: CountryListingService,
    neighbors: NeighborService,
}

fn create_services() -> Services {
    let store = MemoryStore::new();
    let shared: Arc<dyn RecordStore> = Arc::new(store.clone());
    let countries = CountryRepository::new(shared.clone());

    Services {
        listing: CountryListingService::new(countries.clone()),
        neighbors: NeighborService::new(countries.clone(), NeighborRepository::new(shared)),
        countries,
        store,
    }
}

fn drafts(value: serde_json::Value) -> Vec<CountryDraft> {
    serde_json::from_value(value).unwrap()
}

// =========================================================================
// Creation and listing
// =========================================================================

#[tokio::test]
async fn test_created_countries_are_listed_by_area() {
    let services = create_services();
    services
        .countries
        .create(drafts(json!([
            { "name": "Small", "capital": "S", "region": "Asia", "currency": "X", "area": 10.5 },
            { "name": "Unknown", "capital": "U", "region": "Asia", "currency": "X" },
            { "name": "Large", "capital": "L", "region": "Asia", "currency": "X", "area": 9000.0 }
        ])))
        .await
        .unwrap();

    let query = ListQuery {
        sort_by: SortOption::AreaHighToLow,
        ..ListQuery::default()
    };
    let page = services.listing.list(&query).await.unwrap();

    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Large", "Small", "Unknown"]);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_failed_batch_write_leaves_store_empty() {
    let services = create_services();
    services.store.fail_next_writes(1);

    let err = services
        .countries
        .create(drafts(json!([
            { "name": "A", "capital": "A", "region": "R", "currency": "C" },
            { "name": "B", "capital": "B", "region": "R", "currency": "C" }
        ])))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Storage(_)));
    let page = services.listing.list(&ListQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.pages, 0);
}

// =========================================================================
// Neighbor relations
// =========================================================================

#[tokio::test]
async fn test_relations_are_directed() {
    let services = create_services();
    let created = services
        .countries
        .create(drafts(json!([
            { "name": "A", "capital": "A", "region": "R", "currency": "C" },
            { "name": "B", "capital": "B", "region": "R", "currency": "C" }
        ])))
        .await
        .unwrap();
    let (a, b) = (&created[0].country_id, &created[1].country_id);

    let addition = services
        .neighbors
        .add_neighbors(a, &[b.clone()])
        .await
        .unwrap();
    assert_eq!(addition.status(), AdditionStatus::Applied);

    let of_a = services.neighbors.get_neighbors(a).await.unwrap();
    let of_b = services.neighbors.get_neighbors(b).await.unwrap();
    assert_eq!(of_a.len(), 1);
    assert_eq!(&of_a[0].id, b);
    assert!(of_b.is_empty());
}

#[tokio::test]
async fn test_write_failure_skips_only_that_neighbor() {
    let services = create_services();
    let created = services
        .countries
        .create(drafts(json!([
            { "name": "A", "capital": "A", "region": "R", "currency": "C" },
            { "name": "B", "capital": "B", "region": "R", "currency": "C" },
            { "name": "C", "capital": "C", "region": "R", "currency": "C" }
        ])))
        .await
        .unwrap();
    let (a, b, c) = (
        &created[0].country_id,
        &created[1].country_id,
        &created[2].country_id,
    );

    services.store.fail_next_writes(1);
    let addition = services
        .neighbors
        .add_neighbors(a, &[b.clone(), c.clone()])
        .await
        .unwrap();
    assert_eq!(addition.added, vec![c.clone()]);
    assert_eq!(addition.errors.len(), 1);

    let stored: Vec<String> = services
        .neighbors
        .get_neighbors(a)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(stored, vec![c.clone()]);
}

#[tokio::test]
async fn test_float_population_is_accepted_and_sorted() {
    let services = create_services();
    services
        .countries
        .create(drafts(json!([
            {
                "name": "Germany", "capital": "Berlin", "region": "Europe",
                "currency": "EUR", "population": 83240000.0
            },
            {
                "name": "Austria", "capital": "Vienna", "region": "Europe",
                "currency": "EUR", "population": 8917000
            }
        ])))
        .await
        .unwrap();

    let query = ListQuery {
        sort_by: SortOption::PopulationHighToLow,
        ..ListQuery::default()
    };
    let page = services.listing.list(&query).await.unwrap();

    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Germany", "Austria"]);
    assert_eq!(page.items[0].population, Some(83240000.0));
}

#[tokio::test]
async fn test_unavailable_store_fails_every_read() {
    let services = create_services();
    services.store.set_available(false);

    assert!(matches!(
        services.listing.list(&ListQuery::default()).await,
        Err(ServiceError::Storage(_))
    ));
    assert!(matches!(
        services.neighbors.get_neighbors("any").await,
        Err(ServiceError::Storage(_))
    ));
}
