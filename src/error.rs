use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::render::RenderError;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid base64 data: {0}")]
    InvalidEncoding(String),

    #[error("Invalid file id: {0}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Render service error: {0}")]
    Render(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidEncoding(_)
            | AppError::InvalidIdentifier(_)
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Render(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = %status, "{}", self);
        } else {
            warn!(status = %status, "{}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => AppError::NotFound(format!("no file with id {}", id)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_client_errors_map_to_4xx() {
        let cases = [
            (
                AppError::InvalidEncoding("bad padding".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::InvalidIdentifier("not-a-valid-id".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::InvalidRequest("no file field".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound("gone".to_string()),
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_backend_faults_map_to_5xx() {
        let storage = AppError::Storage("connection reset".to_string());
        assert_eq!(
            storage.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let render = AppError::Render("upstream unreachable".to_string());
        assert_eq!(render.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_storage_not_found_becomes_not_found() {
        let id = ObjectId::new();
        let err: AppError = StorageError::NotFound(id).into();
        match &err {
            AppError::NotFound(msg) => assert!(msg.contains(&id.to_hex())),
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_backend_fault_stays_server_error() {
        let err: AppError = StorageError::Backend("pool exhausted".to_string()).into();
        match err {
            AppError::Storage(msg) => assert!(msg.contains("pool exhausted")),
            other => panic!("expected Storage, got {:?}", other),
        }
    }
}
