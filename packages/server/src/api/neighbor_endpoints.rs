//! Neighbor endpoints
//!
//! - `GET /countries/:id/neighbour` - Neighbors of a country
//! - `POST /countries/:id/neighbour` - Add neighbors (per-element validation)
//! - `DELETE /countries/:id/neighbour/:neighbor_id` - Remove one relation

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ApiResponse, AppState, HttpError};
use atlas_core::{AdditionStatus, NeighborCountry, ServiceError};

/// `POST` body: `{"neighbors": [{"neighborId": "..."}, ...]}`
#[derive(Debug, Deserialize)]
pub struct AddNeighborsRequest {
    pub neighbors: Vec<NeighborRef>,
}

#[derive(Debug, Deserialize)]
pub struct NeighborRef {
    #[serde(rename = "neighborId")]
    pub neighbor_id: String,
}

#[derive(Debug, Serialize)]
pub struct NeighborCountries {
    pub countries: Vec<NeighborCountry>,
}

#[derive(Debug, Serialize)]
pub struct AddedNeighbors {
    pub neighbors: Vec<String>,
}

/// 200 body for additions where at least one relation was written
#[derive(Debug, Serialize)]
pub struct AddNeighborsResponse {
    pub message: String,
    pub data: AddedNeighbors,
    pub errors: Vec<String>,
}

fn country_error(err: ServiceError) -> HttpError {
    let message = if err.is_not_found() {
        "Country not found".to_string()
    } else {
        format!("Neighbor operation failed: {err}")
    };
    HttpError::empty_envelope(&err, message)
}

fn nothing_added(message: &str, errors: Vec<String>) -> HttpError {
    HttpError::envelope(
        StatusCode::BAD_REQUEST,
        message,
        json!({ "neighbors": [], "errors": errors }),
    )
}

/// List the neighbors of a country
///
/// A country without relations returns `200` with an empty list.
///
/// ```bash
/// curl http://localhost:3001/countries/<id>/neighbour
/// ```
async fn get_neighbors(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
) -> Result<Json<ApiResponse<NeighborCountries>>, HttpError> {
    let countries = state
        .neighbors
        .get_neighbors(&country_id)
        .await
        .map_err(country_error)?;

    let message = if countries.is_empty() {
        "Country has no neighbors"
    } else {
        "Neighbors fetched successfully"
    };
    Ok(Json(ApiResponse::new(message, NeighborCountries { countries })))
}

/// Add neighbors to a country
///
/// ```bash
/// curl -X POST http://localhost:3001/countries/<id>/neighbour \
///   -H "Content-Type: application/json" \
///   -d '{"neighbors": [{"neighborId": "<other-id>"}]}'
/// ```
async fn add_neighbors(
    State(state): State<AppState>,
    Path(country_id): Path<String>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let request: AddNeighborsRequest = serde_json::from_slice(&body)
        .map_err(|e| nothing_added("Invalid request body", vec![e.to_string()]))?;

    let proposed: Vec<String> = request
        .neighbors
        .into_iter()
        .map(|n| n.neighbor_id)
        .collect();

    let addition = state
        .neighbors
        .add_neighbors(&country_id, &proposed)
        .await
        .map_err(country_error)?;

    match addition.status() {
        AdditionStatus::NothingAdded => {
            Err(nothing_added("No neighbors were added", addition.errors))
        }
        AdditionStatus::Applied => {
            let response = AddNeighborsResponse {
                message: "Neighbors added successfully".to_string(),
                data: AddedNeighbors {
                    neighbors: addition.added,
                },
                errors: addition.errors,
            };
            Ok((StatusCode::OK, Json(response)).into_response())
        }
    }
}

/// Remove a single directed relation
///
/// ```bash
/// curl -X DELETE http://localhost:3001/countries/<id>/neighbour/<other-id>
/// ```
async fn remove_neighbor(
    State(state): State<AppState>,
    Path((country_id, neighbor_id)): Path<(String, String)>,
) -> Result<StatusCode, HttpError> {
    state
        .neighbors
        .remove_neighbor(&country_id, &neighbor_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                HttpError::empty_envelope(&e, e.to_string())
            } else {
                country_error(e)
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/countries/:id/neighbour",
            get(get_neighbors).post(add_neighbors),
        )
        .route("/countries/:id/neighbour/:neighbor_id", delete(remove_neighbor))
        .with_state(state)
}
