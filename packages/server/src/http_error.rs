//! HTTP error handling
//!
//! Every failure leaves the API as `{message, code, details?}` with a status
//! derived from the code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use checklist_core::operations::{store_error_kind, ChecklistOperationError, ErrorKind};
use checklist_core::RowStoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_OPERATION" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "STORE_CONFLICT" => StatusCode::CONFLICT,
            "RATE_LIMITED" => StatusCode::TOO_MANY_REQUESTS,
            "STORE_UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            "STORE_TIMEOUT" => StatusCode::GATEWAY_TIMEOUT,
            "STORE_UNAUTHORIZED" | "STORE_ERROR" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn code_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidOperation => "INVALID_OPERATION",
        ErrorKind::Validation => "VALIDATION_ERROR",
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::RateLimited => "RATE_LIMITED",
        ErrorKind::Unavailable => "STORE_UNAVAILABLE",
        ErrorKind::Timeout => "STORE_TIMEOUT",
        ErrorKind::Unauthorized => "STORE_UNAUTHORIZED",
        ErrorKind::Conflict => "STORE_CONFLICT",
        ErrorKind::Upstream => "STORE_ERROR",
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ChecklistOperationError> for HttpError {
    fn from(err: ChecklistOperationError) -> Self {
        match err {
            ChecklistOperationError::Store(store_error) => store_error.into(),
            other => HttpError::new(other.to_string(), code_for(other.kind())),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::new(rejection.body_text(), "VALIDATION_ERROR")
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        HttpError::new(rejection.body_text(), "VALIDATION_ERROR")
    }
}

impl From<RowStoreError> for HttpError {
    fn from(err: RowStoreError) -> Self {
        let kind = store_error_kind(&err);
        if kind == ErrorKind::Upstream {
            tracing::error!(error = %err, "Row store request failed");
        }

        match &err {
            RowStoreError::Api {
                status, error_code, ..
            } => HttpError::with_details(
                err.to_string(),
                code_for(kind),
                format!("upstream status: {}, error code: {:?}", status, error_code),
            ),
            _ if err.is_retryable() => {
                HttpError::with_details(err.to_string(), code_for(kind), "retryable")
            }
            _ => HttpError::new(err.to_string(), code_for(kind)),
        }
    }
}
