//! Checklist Core
//!
//! Hierarchical checklists stored in a flat, parent-pointer row store (a
//! Smartsheet sheet in production).
//!
//! # Architecture
//!
//! - **Flat source of truth**: the row store holds rows with `parent_id` and
//!   owns sibling order; nothing is persisted locally
//! - **Trees are values**: every read rebuilds the forest from a fresh snapshot
//! - **Relative mutations only**: operations send "under this parent" or
//!   "next to this sibling", never absolute positions
//!
//! # Modules
//!
//! - [`models`] - Checklist items, statuses and input types
//! - [`tree`] - Forest reconstruction and sibling/parent lookups
//! - [`gateway`] - Row store contract, in-memory store, Smartsheet client
//! - [`operations`] - Get/Add/Update/Delete/Indent/Outdent/Move operations
//! - [`config`] - Smartsheet connection settings

pub mod config;
pub mod gateway;
pub mod models;
pub mod operations;
pub mod tree;

// Re-export commonly used types
pub use config::{ConfigError, SmartsheetConfig};
pub use gateway::{RowStore, RowStoreError, RowStoreProvider, SheetId};
pub use models::*;
pub use operations::{ChecklistOperationError, ChecklistOperations, ErrorKind};
pub use tree::build_forest;
