//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use biblio_store::StoreError;

/// Error response body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub mensaje: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::not_found(err.to_string()),
            StoreError::BookUnavailable { .. } => AppError::validation(err.to_string()),
        }
    }
}

/// Result alias for handlers
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let message = match self {
            AppError::Validation { message } | AppError::NotFound { message } => {
                tracing::warn!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    message = %message,
                    "Request rejected"
                );
                message
            }
            AppError::Internal(e) => {
                tracing::error!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "Request error"
                );
                // Internal details stay in the logs for release builds
                if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    "An internal server error occurred".to_string()
                }
            }
        };

        (status, Json(ErrorBody { mensaje: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_store::RecordKind;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let error = AppError::validation("nombre y email son requeridos");

        match error {
            AppError::Validation { message } => {
                assert_eq!(message, "nombre y email son requeridos");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_error_response_mapping() {
        let response = AppError::not_found("Usuario no encontrado").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::validation("existencia es requerida").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("lock poisoned");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors_map_to_statuses() {
        let missing: AppError = StoreError::NotFound(RecordKind::Book).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let unavailable: AppError = StoreError::BookUnavailable { book_id: 3 }.into();
        assert_eq!(unavailable.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let error: AppError = StoreError::NotFound(RecordKind::Review).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"mensaje": "Reseña no encontrada"}));
    }
}
