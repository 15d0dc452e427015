//! API error responses
//!
//! Every handler returns `Result<_, ApiError>`; errors render as
//! `{"error": "<message>"}` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] qcdash_common::Error),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest("Missing required fields".to_string())
    }

    /// 400 for a required query parameter or body id
    pub fn required(what: &str) -> Self {
        ApiError::BadRequest(format!("{} is required", what))
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{} not found: {}", what, id))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Database(sqlx::Error::Database(db)) if db.is_check_violation() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(e) if e.kind() == std::io::ErrorKind::InvalidInput => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Database(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Common(qcdash_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                "Referenced project or audit does not exist".to_string()
            }
            ApiError::Database(sqlx::Error::Database(db)) if db.is_check_violation() => {
                "Value out of range".to_string()
            }
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!("{}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::missing_fields().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("CAPA", "x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::UnsupportedType("exe".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Common(qcdash_common::Error::InvalidInput("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad id")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::missing_fields().to_string(), "Missing required fields");
        assert_eq!(ApiError::required("Project ID").to_string(), "Project ID is required");
        assert_eq!(ApiError::not_found("Audit", "a1").to_string(), "Audit not found: a1");
    }
}
