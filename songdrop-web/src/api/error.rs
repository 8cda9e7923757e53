//! HTTP mapping for domain errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use songdrop_common::Error;
use tracing::error;

/// Wrapper turning [`songdrop_common::Error`] into an HTTP response.
///
/// Caller mistakes map to 4xx with the domain message in the body; storage
/// and internal faults map to 500 with a generic body and a logged detail.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation(_) | Error::InvalidOrder(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            Error::DuplicateReference(_) | Error::Conflict(_) => {
                (StatusCode::CONFLICT, self.0.to_string())
            }
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
