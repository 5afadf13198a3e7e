//! API Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reading_validator::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use water_store::StoreError;

/// Errors returned by submission handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected before reaching the store
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store could not be read or rewritten
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(e) => {
                error!("Store failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
