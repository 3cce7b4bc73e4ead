//! # HTTP API Errors
//!
//! Every failure a handler can return, with its status code and body.
//! Field-scoped failures render as a field → messages object; everything
//! else renders as `{"detail": ...}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::forms::validate::FORM_NUMBER;
use crate::forms::ValidationErrors;
use crate::store::StoreError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Message attached to `formNumber` when it collides with a stored form
pub const DUPLICATE_FORM_NUMBER_MESSAGE: &str =
    "wheel specification with this form number already exists.";

/// Detail returned when the store cannot serve a request
pub const STORAGE_UNAVAILABLE_DETAIL: &str = "Storage is temporarily unavailable.";

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Submission failed field validation
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Form number already stored
    #[error("Form number already exists: {0}")]
    DuplicateFormNumber(String),

    /// Body or query string could not be decoded
    #[error("{detail}")]
    MalformedRequest { status: StatusCode, detail: String },

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store unreachable or failed mid-operation
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateFormNumber(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedRequest { status, .. } => *status,
            ApiError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Body for errors that are not tied to a field
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(form_number) => ApiError::DuplicateFormNumber(form_number),
            StoreError::StorageUnavailable(message) => ApiError::StorageUnavailable(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = match rejection {
            JsonRejection::JsonSyntaxError(ref inner) => {
                format!("JSON parse error - {}", inner.body_text())
            }
            ref other => other.body_text(),
        };
        ApiError::MalformedRequest {
            status: rejection.status(),
            detail,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest {
            status: StatusCode::BAD_REQUEST,
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::DuplicateFormNumber(_) => (
                status,
                Json(ValidationErrors::single(
                    FORM_NUMBER,
                    DUPLICATE_FORM_NUMBER_MESSAGE,
                )),
            )
                .into_response(),
            ApiError::MalformedRequest { detail, .. } => {
                (status, Json(DetailResponse { detail })).into_response()
            }
            ApiError::StorageUnavailable(_) => (
                status,
                Json(DetailResponse {
                    detail: STORAGE_UNAVAILABLE_DETAIL.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
