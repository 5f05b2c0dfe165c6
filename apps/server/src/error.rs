//! Error handling for the quiz API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jtyping_core::QuizError;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Quiz(e) if e.is_rejected_input() => {
                (StatusCode::UNPROCESSABLE_ENTITY, "malformed_answer")
            }
            ApiError::Quiz(QuizError::InvalidFilter(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_filter")
            }
            ApiError::Quiz(_) => (StatusCode::INTERNAL_SERVER_ERROR, "quiz_error"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let error = ApiError::NotFound("session 123".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        let error = ApiError::Conflict("selection superseded".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_malformed_answer_status() {
        let error = ApiError::Quiz(QuizError::MalformedAnswer {
            input: "abc1".to_string(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_shape_mismatch_status() {
        let error = ApiError::Quiz(QuizError::ShapeMismatch {
            input: "たべた".to_string(),
            surface: "食べる".to_string(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_invalid_filter_status() {
        let error = ApiError::Quiz(QuizError::InvalidFilter("gradeMax 0".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_data_integrity_status() {
        let error = ApiError::Quiz(QuizError::DataIntegrity("entry 1 has no spelling".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("lock poisoned".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::NotFound("Session abc".to_string());
        assert_eq!(error.to_string(), "Not found: Session abc");
    }

    #[test]
    fn test_error_display_conflict() {
        let error = ApiError::Conflict("round is not accepting answers".to_string());
        assert_eq!(error.to_string(), "Conflict: round is not accepting answers");
    }

    #[test]
    fn test_error_display_quiz() {
        let error = ApiError::Quiz(QuizError::NoCandidates);
        assert_eq!(
            error.to_string(),
            "Quiz error: no candidates match the active filter"
        );
    }
}
