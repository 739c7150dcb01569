use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Tolerance on `|Σ weight − 1.0|` for any weight set used in one evaluation.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Errors raised by the scoring core (extraction, aggregation, metrics).
///
/// Empty inputs are never errors: every metric has a defined zero/neutral result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("Weights must sum to 1.0 (±{tolerance}), got {sum:.4}")]
    InvalidWeights { sum: f64, tolerance: f64 },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl ScoringError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ScoringError::MalformedInput(msg.into())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Bodies that fail to parse, including labels or signals rejected during
/// deserialization, are malformed input like any other.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Scoring(ScoringError::malformed(rejection.body_text()))
    }
}

/// `Json` extractor whose rejection goes through [`AppError`]'s JSON body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Scoring(e @ ScoringError::InvalidWeights { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_WEIGHTS",
                e.to_string(),
            ),
            AppError::Scoring(e @ ScoringError::MalformedInput(_)) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_INPUT", e.to_string())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_weights_maps_to_422() {
        let err = AppError::from(ScoringError::InvalidWeights {
            sum: 1.1,
            tolerance: WEIGHT_SUM_TOLERANCE,
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_malformed_input_maps_to_400() {
        let err = AppError::from(ScoringError::malformed("label 2.0 outside [0, 1]"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_weights_message_includes_sum() {
        let err = ScoringError::InvalidWeights {
            sum: 1.1,
            tolerance: 0.01,
        };
        assert!(err.to_string().contains("1.1000"));
    }
}
