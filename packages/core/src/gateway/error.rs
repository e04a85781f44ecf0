//! Row Store Error Types
//!
//! Errors raised by any [`RowStore`](super::RowStore) implementation. The
//! structural operations never interpret or retry these; they are passed to
//! the caller unchanged so it can pick its own retry/backoff policy.

use crate::models::RowId;
use thiserror::Error;

/// Row store operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowStoreError {
    /// Row does not exist in the sheet
    #[error("Row not found: {row_id}")]
    RowNotFound { row_id: RowId },

    /// Sheet does not exist or is not visible to the credential
    #[error("Sheet not found: {sheet_id}")]
    SheetNotFound { sheet_id: i64 },

    /// Store refused the change (row has children, would create a cycle, ...)
    #[error("Row store rejected the request: {reason}")]
    Rejected { reason: String },

    /// Too many requests, caller should back off
    #[error("Row store rate limit exceeded")]
    RateLimited,

    /// Store is down for maintenance or temporarily unavailable
    #[error("Row store unavailable: {0}")]
    Unavailable(String),

    /// Request did not complete in time
    #[error("Row store request timed out")]
    Timeout,

    /// Credential missing, invalid or lacking access
    #[error("Row store rejected credentials: {0}")]
    Unauthorized(String),

    /// Any other error reported by the store's API
    #[error("Row store API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        error_code: Option<i64>,
        message: String,
    },

    /// Connection-level failure
    #[error("Failed to communicate with row store: {0}")]
    Transport(String),

    /// Response did not have the expected shape
    #[error("Malformed row store response: {0}")]
    MalformedResponse(String),

    /// Gateway could not be constructed from its configuration
    #[error("Invalid row store configuration: {0}")]
    ConfigError(String),
}

impl RowStoreError {
    /// Create a row not found error
    pub fn row_not_found(row_id: RowId) -> Self {
        Self::RowNotFound { row_id }
    }

    /// Create a sheet not found error
    pub fn sheet_not_found(sheet_id: i64) -> Self {
        Self::SheetNotFound { sheet_id }
    }

    /// Create a rejected error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// True when the same request may succeed if retried later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Unavailable(_) | Self::Timeout | Self::Transport(_)
        )
    }

    /// True for row and sheet not-found errors
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RowNotFound { .. } | Self::SheetNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(RowStoreError::RateLimited.is_retryable());
        assert!(RowStoreError::Timeout.is_retryable());
        assert!(RowStoreError::Unavailable("maintenance".into()).is_retryable());
        assert!(RowStoreError::Transport("reset".into()).is_retryable());

        assert!(!RowStoreError::row_not_found(1).is_retryable());
        assert!(!RowStoreError::rejected("has children").is_retryable());
        assert!(!RowStoreError::malformed("bad json").is_retryable());
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(RowStoreError::row_not_found(7).is_not_found());
        assert!(RowStoreError::sheet_not_found(7).is_not_found());
        assert!(!RowStoreError::RateLimited.is_not_found());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(RowStoreError::row_not_found(42).to_string(), "Row not found: 42");
        assert_eq!(
            RowStoreError::rejected("row 3 has children").to_string(),
            "Row store rejected the request: row 3 has children"
        );
        let api = RowStoreError::Api {
            status: 400,
            error_code: Some(1008),
            message: "Unable to parse request".to_string(),
        };
        assert_eq!(
            api.to_string(),
            "Row store API error (HTTP 400): Unable to parse request"
        );
    }
}
