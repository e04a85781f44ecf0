//! Error types for the checklist operations layer
//!
//! Precondition failures are detected locally, before any remote mutation.
//! Row store failures are wrapped unchanged so callers can still inspect
//! them (and decide whether to retry).

use crate::gateway::RowStoreError;
use crate::models::{RowId, ValidationError};
use thiserror::Error;

/// Errors returned by [`ChecklistOperations`](super::ChecklistOperations)
///
/// # Examples
///
/// ```rust
/// use checklist_core::operations::{ChecklistOperationError, ErrorKind};
///
/// let err = ChecklistOperationError::invalid("Cannot indent: no sibling above");
/// assert_eq!(err.kind(), ErrorKind::InvalidOperation);
/// assert_eq!(err.to_string(), "Cannot indent: no sibling above");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistOperationError {
    /// Structural precondition not met; nothing was sent to the store
    #[error("{reason}")]
    InvalidOperation { reason: String },

    /// Input fields rejected before reaching the store
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Target row is not in the current snapshot
    #[error("Item not found: {row_id}")]
    NotFound { row_id: RowId },

    /// Failure reported by the row store, unmodified
    #[error(transparent)]
    Store(#[from] RowStoreError),
}

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidOperation,
    Validation,
    NotFound,
    RateLimited,
    Unavailable,
    Timeout,
    Unauthorized,
    /// The store refused the change as it stands; retrying will not help
    Conflict,
    Upstream,
}

impl ChecklistOperationError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    pub fn not_found(row_id: RowId) -> Self {
        Self::NotFound { row_id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Self::ValidationFailed(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Store(error) => store_error_kind(error),
        }
    }

    /// True when the underlying store failure is transient
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(error) if error.is_retryable())
    }
}

/// Classify a row store error on its own
pub fn store_error_kind(error: &RowStoreError) -> ErrorKind {
    match error {
        RowStoreError::RowNotFound { .. } | RowStoreError::SheetNotFound { .. } => ErrorKind::NotFound,
        RowStoreError::RateLimited => ErrorKind::RateLimited,
        RowStoreError::Unavailable(_) => ErrorKind::Unavailable,
        RowStoreError::Timeout => ErrorKind::Timeout,
        RowStoreError::Unauthorized(_) => ErrorKind::Unauthorized,
        RowStoreError::Rejected { .. } => ErrorKind::Conflict,
        RowStoreError::Api { .. }
        | RowStoreError::Transport(_)
        | RowStoreError::MalformedResponse(_)
        | RowStoreError::ConfigError(_) => ErrorKind::Upstream,
    }
}
