//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use inference_engine::InferenceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected at the boundary
    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Model evaluation failed
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// Blocking worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    Worker(String),
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "validation failed",
                    details: errors
                        .iter()
                        .map(|e| FieldError {
                            field: e.field(),
                            message: e.to_string(),
                        })
                        .collect(),
                },
            ),
            ApiError::Inference(e) => {
                error!("Prediction failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "prediction failed",
                        details: Vec::new(),
                    },
                )
            }
            ApiError::Worker(e) => {
                error!("Worker task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal error",
                        details: Vec::new(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
