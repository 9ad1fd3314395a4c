//! Error types for the durable store and the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of the durable store
///
/// Every variant is treated the same way by callers: visits absorb it into
/// the fallback buffer, contact intake surfaces it as 503.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("durable store unavailable")]
    Unavailable,
}

/// Errors surfaced to API callers
#[derive(Error, Debug)]
pub enum AppError {
    /// The caller sent an incomplete or malformed request
    #[error("{0}")]
    Validation(String),

    #[error("Service unavailable: unable to store message, please try again later")]
    PersistenceUnavailable(#[from] StoreError),

    /// Catch-all; the detail is logged, never returned
    #[error("Internal Server Error")]
    Unexpected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::PersistenceUnavailable(source) => {
                tracing::error!("Durable store failure: {source}");
            }
            AppError::Unexpected(detail) => {
                tracing::error!("Unexpected error: {detail}");
            }
            AppError::Validation(_) => {}
        }

        (
            self.status(),
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
