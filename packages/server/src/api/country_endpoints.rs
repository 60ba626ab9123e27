//! Country endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /countries` - Create one or many countries
//! - `GET /countries` - Paginated, sortable, searchable listing
//! - `GET /countries/:id` - Single country by id

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::{ApiResponse, AppState, HttpError};
use atlas_core::services::listing::CountryPage;
use atlas_core::{Country, CountryDraft, ListQuery, ServiceError};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create countries from a JSON array
///
/// The body is parsed here rather than by `Json<T>` so that malformed and
/// non-array bodies get the same `500 {message, error}` response as every
/// other creation failure.
///
/// ```bash
/// curl -X POST http://localhost:3001/countries \
///   -H "Content-Type: application/json" \
///   -d '[{"name": "Chile", "capital": "Santiago", "region": "Americas", "currency": "CLP"}]'
/// ```
async fn create_countries(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Vec<Country>>), HttpError> {
    const FAILED: &str = "Failed to create countries";

    let drafts: Vec<CountryDraft> = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("⚠️  Rejected country payload: {}", e);
        HttpError::detailed(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e)
    })?;

    let created = state
        .countries
        .create(drafts)
        .await
        .map_err(|e| HttpError::detailed(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// List countries
///
/// # Query Parameters
///
/// - `page`, `limit`: positive integers (defaults 1 and 10; bad values fall back)
/// - `sort_by`: `a_to_z` (default), `z_to_a`, `population_high_to_low`,
///   `population_low_to_high`, `area_high_to_low`, `area_low_to_high`
/// - `search`: case-insensitive text matched against name, region, subregion
///
/// ```bash
/// curl "http://localhost:3001/countries?page=2&limit=5&sort_by=z_to_a&search=asia"
/// ```
async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<CountryPage>>, HttpError> {
    let query = ListQuery::from_raw(
        params.get("page").map(String::as_str),
        params.get("limit").map(String::as_str),
        params.get("sort_by").map(String::as_str),
        params.get("search").map(String::as_str),
    );

    let page = state
        .listing
        .list(&query)
        .await
        .map_err(|e| HttpError::empty_envelope(&e, format!("Failed to fetch countries: {e}")))?;

    Ok(Json(ApiResponse::new("Countries fetched successfully", page)))
}

/// Get a country by id
///
/// ```bash
/// curl http://localhost:3001/countries/0f8e8d36-5d0c-4a8e-9a53-3b1f0c6e2a11
/// ```
async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Country>, HttpError> {
    match state.countries.get_by_id(&id).await {
        Ok(country) => Ok(Json(country)),
        Err(ServiceError::NotFound { .. }) => Err(HttpError::not_found()),
        Err(e) => Err(HttpError::detailed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch country",
            e,
        )),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/countries", get(list_countries).post(create_countries))
        .route("/countries/:id", get(get_country))
        .with_state(state)
}
