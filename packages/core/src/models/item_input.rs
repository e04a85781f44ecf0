//! Input payloads for creating and updating checklist items.

use super::{ItemStatus, RowId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length (in characters) of `name` and `assignee`
pub const MAX_FIELD_LENGTH: usize = 255;

/// Validation errors for item payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' exceeds maximum length of {max} characters")]
    TooLong { field: String, max: usize },
}

/// Fields for a new row
///
/// Only `name` is required; the rest default to `Not Started`, empty text
/// and no parent (a new root appended at the bottom).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub parent_id: Option<RowId>,
}

impl NewItem {
    /// New root item with default fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ItemStatus::default(),
            assignee: String::new(),
            notes: String::new(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: RowId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Check field constraints before anything is sent to a row store
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_length("assignee", &self.assignee)
    }
}

/// Sparse update: only `Some` fields are written, the rest stay as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItemUpdate {
    /// True when no field is supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.assignee.is_none() && self.notes.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(assignee) = &self.assignee {
            validate_length("assignee", assignee)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".to_string()));
    }
    validate_length("name", name)
}

fn validate_length(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LENGTH,
        });
    }
    Ok(())
}
