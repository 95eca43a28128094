//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::SignupError;
use crate::validation::FieldError;

/// Application-level error type for the signup service.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more signup fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// An account with this email is already registered.
    #[error("account already exists")]
    DuplicateAccount,

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SignupError> for AppError {
    fn from(err: SignupError) -> Self {
        match err {
            SignupError::AccountExists => Self::DuplicateAccount,
            SignupError::Repository(e) => Self::Database(e),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; client errors are expected traffic.
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            // Ordered array body, one entry per failing field.
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            Self::DuplicateAccount => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "User with that email already exists" })),
            )
                .into_response(),
            // Generic envelope; detail stays server-side.
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_render_as_array() {
        let err = AppError::Validation(vec![FieldError {
            location: "body",
            msg: "Email not present",
            param: "email",
            value: String::new(),
        }]);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json.is_array());
        assert_eq!(json[0]["msg"], "Email not present");
    }

    #[tokio::test]
    async fn test_duplicate_account_envelope() {
        let response = AppError::DuplicateAccount.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "User with that email already exists");
    }

    #[tokio::test]
    async fn test_storage_error_hides_detail() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "secret detail".to_owned(),
        ));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "internal error");
        assert!(!json.to_string().contains("secret detail"));
    }
}
