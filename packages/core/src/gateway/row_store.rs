//! RowStore Trait - Row Store Abstraction Layer
//!
//! This module defines the `RowStore` trait: the six remote capabilities the
//! structural operations are built on. Any store that keeps an ordered flat
//! list of rows with parent pointers, and supports sibling-relative reorder
//! plus parent-relative move, can back a checklist.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async; the production store is a
//!    network API
//! 2. **Relative positioning only**: callers never send absolute positions,
//!    only "under this parent" or "next to this sibling"
//! 3. **Store owns ordering**: the order of `get_rows()` is the sibling order
//! 4. **No cascades**: deleting is a single-row request; subtree semantics
//!    belong to the store
//!
//! # Examples
//!
//! ```rust,no_run
//! use checklist_core::gateway::{InMemoryRowStore, RowStore};
//! use checklist_core::models::NewItem;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn RowStore> = Arc::new(InMemoryRowStore::new());
//!
//!     let parent = store.add_row(NewItem::new("Launch")).await?;
//!     store
//!         .add_row(NewItem::new("Write announcement").with_parent(parent.id))
//!         .await?;
//!
//!     let rows = store.get_rows().await?;
//!     assert_eq!(rows.len(), 2);
//!     Ok(())
//! }
//! ```

use super::RowStoreError;
use crate::models::{ChecklistItem, ItemUpdate, NewItem, RowId};
use async_trait::async_trait;
use std::sync::Arc;

/// Abstraction over one sheet of a remote row store
///
/// Implementations must be `Send + Sync` so a store can be shared across
/// request handlers as `Arc<dyn RowStore>`.
///
/// Rows returned by any method have empty `children`; the tree is built by
/// [`crate::tree::build_forest`].
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch every row of the sheet in display order
    ///
    /// The relative order of rows sharing a parent is their sibling order.
    async fn get_rows(&self) -> Result<Vec<ChecklistItem>, RowStoreError>;

    /// Append a row
    ///
    /// With `parent_id` the row becomes the last child of that parent,
    /// otherwise the last root.
    async fn add_row(&self, item: NewItem) -> Result<ChecklistItem, RowStoreError>;

    /// Write the supplied fields of `update`, leaving the others unchanged
    async fn update_row(&self, id: RowId, update: ItemUpdate)
        -> Result<ChecklistItem, RowStoreError>;

    /// Remove a single row
    ///
    /// # Errors
    ///
    /// Stores that do not delete subtrees must fail cleanly (no partial
    /// removal) when the row has children.
    async fn delete_row(&self, id: RowId) -> Result<(), RowStoreError>;

    /// Reparent a row together with its descendants
    ///
    /// `Some(parent)` makes the row the parent's first child; `None` moves it
    /// to the top of the root list.
    async fn move_row(&self, id: RowId, parent_id: Option<RowId>)
        -> Result<ChecklistItem, RowStoreError>;

    /// Place a row immediately above (`above = true`) or below `sibling_id`
    ///
    /// The row keeps its parent. Descendants travel with it.
    async fn reorder_row(
        &self,
        id: RowId,
        sibling_id: RowId,
        above: bool,
    ) -> Result<ChecklistItem, RowStoreError>;
}

/// Identifier of a sheet within a row store account
pub type SheetId = i64;

/// Opens row stores for sheets and provisions new sheets
///
/// Lets an application hold one long-lived connection object and hand a
/// sheet-scoped [`RowStore`] to each request.
#[async_trait]
pub trait RowStoreProvider: Send + Sync {
    /// Row store bound to `sheet_id`
    fn open_sheet(&self, sheet_id: SheetId) -> Result<Arc<dyn RowStore>, RowStoreError>;

    /// Create an empty checklist sheet and return its id
    async fn create_sheet(&self, name: &str) -> Result<SheetId, RowStoreError>;
}
