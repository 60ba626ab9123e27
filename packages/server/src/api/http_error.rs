//! HTTP error handling
//!
//! Existing clients expect a different error body per route family, so an
//! `HttpError` carries both the status and one of three body shapes:
//!
//! - `{message, error}` - country creation and lookup failures
//! - `{message, data}` - listing and neighbor routes
//! - `{error}` - single-country lookup miss
//!
//! Bodies only ever contain `Display` output, never debug dumps.

use atlas_core::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorBody {
    Detailed { message: String, error: String },
    Envelope { message: String, data: Value },
    Bare { error: String },
}

#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl HttpError {
    pub fn new(status: StatusCode, body: ErrorBody) -> Self {
        Self { status, body }
    }

    /// `{message, error}` body
    pub fn detailed(status: StatusCode, message: impl Into<String>, error: impl ToString) -> Self {
        Self::new(
            status,
            ErrorBody::Detailed {
                message: message.into(),
                error: error.to_string(),
            },
        )
    }

    /// `{message, data}` body
    pub fn envelope(status: StatusCode, message: impl Into<String>, data: Value) -> Self {
        Self::new(
            status,
            ErrorBody::Envelope {
                message: message.into(),
                data,
            },
        )
    }

    /// `{message, data: {}}` body with the status derived from `err`
    pub fn empty_envelope(err: &ServiceError, message: impl Into<String>) -> Self {
        Self::envelope(status_for(err), message, Value::Object(Default::default()))
    }

    /// `{error: "not found"}`
    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorBody::Bare {
                error: "not found".to_string(),
            },
        )
    }
}

/// Status code for each service error class
pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::DanglingNeighbor { .. } | ServiceError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("❌ {} response: {:?}", self.status, self.body);
        } else {
            tracing::debug!("{} response: {:?}", self.status, self.body);
        }

        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::db::StoreError;
    use atlas_core::ValidationError;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ServiceError::Validation(ValidationError::EmptyBatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&ServiceError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&ServiceError::dangling_neighbor("a", "b")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ServiceError::Storage(StoreError::unavailable("down"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_body_shapes() {
        let detailed = serde_json::to_value(
            HttpError::detailed(StatusCode::INTERNAL_SERVER_ERROR, "Failed", "boom").body,
        )
        .unwrap();
        assert_eq!(detailed, json!({ "message": "Failed", "error": "boom" }));

        let envelope = serde_json::to_value(
            HttpError::empty_envelope(&ServiceError::not_found("x"), "Country not found").body,
        )
        .unwrap();
        assert_eq!(envelope, json!({ "message": "Country not found", "data": {} }));

        let bare = serde_json::to_value(HttpError::not_found().body).unwrap();
        assert_eq!(bare, json!({ "error": "not found" }));
    }
}
