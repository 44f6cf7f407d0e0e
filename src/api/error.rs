//! Mapping of library errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::ChunkingError;

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ChunkingError> for ApiError {
    fn from(err: ChunkingError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unknown = ApiError::from(ChunkingError::InvalidArgument("Unknown strategy: x".to_string()));
        assert_eq!(unknown.into_response().status(), StatusCode::BAD_REQUEST);

        let config = ApiError::from(ChunkingError::Configuration {
            chunk_size: 10,
            chunk_overlap: 10,
        });
        assert_eq!(config.into_response().status(), StatusCode::BAD_REQUEST);

        let decode = ApiError::from(ChunkingError::EncodingRoundTrip { expected: 3, actual: 2 });
        assert_eq!(decode.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
