//! Checklist item and status types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row identifier assigned by the row store. Never generated locally.
pub type RowId = i64;

/// Status picklist for checklist items
///
/// Serialized with the display strings used by the row store's picklist
/// column (`"Not Started"`, `"In Progress"`, `"Complete"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Item not yet started (default)
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Item currently being worked on
    #[serde(rename = "In Progress")]
    InProgress,
    /// Item done
    #[serde(rename = "Complete")]
    Complete,
}

impl ItemStatus {
    /// All statuses in picklist order
    pub const ALL: [ItemStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Complete];

    /// Display string as stored in the row store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Not Started" => Ok(Self::NotStarted),
            "In Progress" => Ok(Self::InProgress),
            "Complete" => Ok(Self::Complete),
            other => Err(format!("Invalid item status: {}", other)),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the outline
///
/// # Fields
///
/// - `id`: Row id assigned by the row store
/// - `parent_id`: Parent row, `None` for roots. Authoritative for hierarchy.
/// - `indent`: Depth hint reported by the store. Informational only; the
///   tree is always derived from `parent_id`.
/// - `children`: Filled in by [`crate::tree::build_forest`] only. Never sent
///   to a row store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: RowId,
    pub name: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub parent_id: Option<RowId>,
    #[serde(default)]
    pub indent: u32,
    #[serde(default)]
    pub children: Vec<ChecklistItem>,
}

impl ChecklistItem {
    /// Create a childless item with default status and empty text fields
    pub fn new(id: RowId, name: impl Into<String>, parent_id: Option<RowId>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ItemStatus::default(),
            assignee: String::new(),
            notes: String::new(),
            parent_id,
            indent: 0,
            children: Vec::new(),
        }
    }

    /// True when the item has no parent reference
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Number of items in this subtree, including the item itself
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ChecklistItem::subtree_len)
            .sum::<usize>()
    }
}
