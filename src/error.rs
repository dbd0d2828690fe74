use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::llm::GenerationError;
use crate::orchestrator::BatchError;
use crate::storage::StorageError;

/// Request-boundary error taxonomy. Per-filter failures never reach this
/// type; they are downgraded to data inside the batch result.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound("Blob not found.".to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::MissingField(field) => {
                ApiError::Validation(format!("No {field} provided."))
            }
            BatchError::SourceNotFound(_) => ApiError::NotFound("Blob not found.".to_string()),
            BatchError::Storage(inner) => ApiError::from(inner),
            BatchError::Generation(inner) => ApiError::Generation(inner),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, status_text, message) = match &self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "400 Bad Request", message.clone())
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, "404 Not Found", message.clone())
            }
            ApiError::Generation(err) => {
                error!("Generation failed at request boundary: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "500 Internal Server Error",
                    "Internal server error.".to_string(),
                )
            }
            ApiError::Storage(err) => {
                error!("Storage failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "500 Internal Server Error",
                    "Internal server error.".to_string(),
                )
            }
        };

        let body = json!({ "status": status_text, "message": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_maps_to_404() {
        let err = ApiError::from(StorageError::NotFound {
            container: "poc-generated-selfi".to_string(),
            blob: "missing.png".to_string(),
        });
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn storage_backend_failure_responds_with_generic_500_body() {
        let response =
            ApiError::Storage(StorageError::Backend("connection reset".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "500 Internal Server Error");
        assert_eq!(body["message"], "Internal server error.");
    }

    #[test]
    fn missing_field_maps_to_original_message() {
        let err = ApiError::from(BatchError::MissingField("session_id"));
        match err {
            ApiError::Validation(message) => assert_eq!(message, "No session_id provided."),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
