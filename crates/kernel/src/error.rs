//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    /// Stable error code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Catalog(e) => e.code(),
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Catalog(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server faults are logged with their source and answered vaguely.
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = ?self, "catalog request failed");
        }

        let payload = ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(payload)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_is_bad_request() {
        let err = AppError::from(CatalogError::InvalidQuery("initial".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_QUERY");
    }

    #[test]
    fn store_errors_are_server_errors_without_detail() {
        let err = AppError::from(CatalogError::from(sqlx::Error::Protocol(
            "relation \"movies\" does not exist".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "EXECUTION_FAILURE");
        assert_eq!(err.to_string(), "catalog query failed");
    }

    #[test]
    fn not_found_status() {
        let err = AppError::NotFound("no movie with that id");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
