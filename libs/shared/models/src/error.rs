use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Body text for every 5xx; details only go to the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // Duplicate keys are reported like any other bad submission
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(details) => {
                tracing::debug!("Validation failed: {:?}", details);
                json!({
                    "error": "Validation failed",
                    "details": details
                })
            }
            AppError::Database(msg) | AppError::Internal(msg) => {
                tracing::error!("Error: {}: {}", status, msg);
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
            AppError::Auth(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => {
                tracing::debug!("Error: {}: {}", status, msg);
                json!({ "error": msg })
            }
        };

        (status, Json(body)).into_response()
    }
}
