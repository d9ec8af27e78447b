use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Taxonomy: per-field validation problems are collected into a
/// `ValidationResult` before they ever become an error; `ScoringUnavailable`
/// is fatal at process scope (startup refuses to continue); `Scoring` and
/// `UnknownCurrency` are recoverable per request and never leave behind a
/// partial result.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::UnknownCurrency(code) => (
                StatusCode::BAD_REQUEST,
                "UNKNOWN_CURRENCY",
                format!("Currency '{code}' is not in the conversion table"),
            ),
            AppError::ScoringUnavailable(msg) => {
                tracing::error!("Scoring unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SCORING_UNAVAILABLE",
                    "The salary model is not available".to_string(),
                )
            }
            AppError::Scoring(msg) => {
                tracing::error!("Scoring error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCORING_ERROR",
                    "Prediction failed - please check your input and try again".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
