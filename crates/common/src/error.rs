//! Common error types and handling for Keepsake

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Keepsake application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A domain rule refused the request. `code` is the machine-checkable
    /// kind (e.g. `COUNT_MISMATCH`, `ILLEGAL_TRANSITION`).
    #[error("{message}")]
    Rejected { code: &'static str, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl Error {
    /// Build a domain rejection with a stable code
    pub fn rejected(code: &'static str, message: impl Into<String>) -> Self {
        Error::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Rejected { code, .. } => *code,
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "CONFLICT",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        tracing::debug!(status = %status, code = error_code, error = %self, "Request refused");

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::Validation("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Conflict("test".to_string()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_every_error_is_a_client_error() {
        let errors = [
            Error::Validation("bad".to_string()),
            Error::rejected("MISSING_QUANTITY", "no quantity"),
            Error::NotFound("order".to_string()),
            Error::Conflict("stale".to_string()),
        ];
        for err in errors {
            assert!(err.status_code().is_client_error(), "{}", err);
        }
    }

    #[test]
    fn test_rejected_keeps_domain_code() {
        let err = Error::rejected("COUNT_MISMATCH", "3 quantities for 2 projects");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "COUNT_MISMATCH");
        assert_eq!(err.to_string(), "3 quantities for 2 projects");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        let response = Error::rejected("ILLEGAL_TRANSITION", "nope").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], "ILLEGAL_TRANSITION");
        assert_eq!(value["error"]["message"], "nope");
    }
}
