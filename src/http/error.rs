//! Central error translation for the HTTP boundary.
//!
//! Every error raised above the transport layer is mapped to an HTTP
//! response exactly once, here. Unknown repository failures never leak
//! internal detail to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::error::AppError;
use crate::validation::FieldError;

/// JSON error body. The request-id middleware adds `requestId` on the way
/// out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            code: None,
            meta: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Validation failed.".to_string(),
                    details: Some(errors.into_errors()),
                    code: None,
                    meta: None,
                },
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody::message(message)),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::message(message)),
            AppError::Conflict(message) => (StatusCode::CONFLICT, ErrorBody::message(message)),
            // A uniqueness violation the service layer did not translate:
            // still a client error, reported with its machine-readable code.
            AppError::Repository(RepositoryError::UniqueViolation { constraint }) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "The request violates a uniqueness constraint.".to_string(),
                    details: None,
                    code: Some("UNIQUE_VIOLATION".to_string()),
                    meta: Some(json!({ "constraint": constraint })),
                },
            ),
            AppError::Repository(err) => {
                error!(error = %err, "repository error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("Internal server error."),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
