//! Checklist Operations
//!
//! Structural edits of one checklist sheet. Every operation follows the same
//! shape:
//!
//! 1. Fetch a fresh snapshot when a decision depends on the current layout
//! 2. Decide locally using the [`crate::tree`] locator, failing with
//!    [`ChecklistOperationError::InvalidOperation`] before any write
//! 3. Issue exactly one relative mutation to the [`RowStore`]
//! 4. Fetch again and return the rebuilt forest
//!
//! Nothing is cached between calls and nothing is retried; two concurrent
//! operations on the same sheet may interleave.

mod error;

pub use error::{store_error_kind, ChecklistOperationError, ErrorKind};

use crate::gateway::RowStore;
use crate::models::{ChecklistItem, ItemUpdate, NewItem, RowId};
use crate::tree::{build_forest, find_item, find_next_sibling, find_parent, find_previous_sibling};
use std::sync::Arc;
use tracing::instrument;

/// Structural operations over one sheet
///
/// # Examples
///
/// ```rust
/// use checklist_core::gateway::InMemoryRowStore;
/// use checklist_core::models::NewItem;
/// use checklist_core::operations::ChecklistOperations;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let ops = ChecklistOperations::new(Arc::new(InMemoryRowStore::new()));
///
/// ops.add_item(NewItem::new("Sign contract")).await.unwrap();
/// let forest = ops.add_item(NewItem::new("Send invoice")).await.unwrap();
///
/// let second = forest[1].id;
/// let forest = ops.indent_item(second).await.unwrap();
/// assert_eq!(forest.len(), 1);
/// assert_eq!(forest[0].children[0].name, "Send invoice");
/// # });
/// ```
#[derive(Clone)]
pub struct ChecklistOperations {
    store: Arc<dyn RowStore>,
}

impl ChecklistOperations {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    async fn snapshot(&self) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        let rows = self.store.get_rows().await?;
        tracing::debug!(rows = rows.len(), "Fetched snapshot");
        Ok(rows)
    }

    async fn render(&self) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        Ok(build_forest(self.snapshot().await?))
    }

    /// Current forest
    #[instrument(skip(self))]
    pub async fn get_checklist(&self) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        self.render().await
    }

    /// Append a new item under `item.parent_id`, or as the last root
    #[instrument(skip(self, item), fields(parent_id = ?item.parent_id))]
    pub async fn add_item(&self, item: NewItem) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        item.validate()?;

        let row = self.store.add_row(item).await?;
        tracing::info!(row_id = row.id, "Added item");
        self.render().await
    }

    /// Write the supplied fields; an empty update only re-renders
    #[instrument(skip(self, update))]
    pub async fn update_item(
        &self,
        id: RowId,
        update: ItemUpdate,
    ) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        update.validate()?;

        if update.is_empty() {
            tracing::debug!("Empty update, skipping write");
        } else {
            self.store.update_row(id, update).await?;
            tracing::info!("Updated item");
        }
        self.render().await
    }

    /// Delete one row; store refusals (for example a row with children)
    /// come back unchanged
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: RowId) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        self.store.delete_row(id).await?;
        tracing::info!("Deleted item");
        self.render().await
    }

    /// Make the item the first child of its previous sibling
    #[instrument(skip(self))]
    pub async fn indent_item(&self, id: RowId) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        let rows = self.snapshot().await?;
        require(&rows, id)?;

        let new_parent = find_previous_sibling(&rows, id)
            .map(|sibling| sibling.id)
            .ok_or_else(|| ChecklistOperationError::invalid("Cannot indent: no sibling above"))?;

        tracing::debug!(new_parent, "Indenting under previous sibling");
        self.store.move_row(id, Some(new_parent)).await?;
        self.render().await
    }

    /// Move the item up one level, under its grandparent (or to the roots)
    #[instrument(skip(self))]
    pub async fn outdent_item(&self, id: RowId) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        let rows = self.snapshot().await?;
        require(&rows, id)?;

        let parent = find_parent(&rows, id)
            .ok_or_else(|| ChecklistOperationError::invalid("Cannot outdent: already at top level"))?;
        let grandparent = find_parent(&rows, parent.id).map(|grandparent| grandparent.id);

        tracing::debug!(parent = parent.id, ?grandparent, "Outdenting");
        self.store.move_row(id, grandparent).await?;
        self.render().await
    }

    /// Swap the item with the sibling directly above it
    #[instrument(skip(self))]
    pub async fn move_item_up(&self, id: RowId) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        let rows = self.snapshot().await?;
        require(&rows, id)?;

        let sibling = find_previous_sibling(&rows, id)
            .map(|sibling| sibling.id)
            .ok_or_else(|| ChecklistOperationError::invalid("Cannot move up: already at the top"))?;

        self.store.reorder_row(id, sibling, true).await?;
        self.render().await
    }

    /// Swap the item with the sibling directly below it
    #[instrument(skip(self))]
    pub async fn move_item_down(&self, id: RowId) -> Result<Vec<ChecklistItem>, ChecklistOperationError> {
        let rows = self.snapshot().await?;
        require(&rows, id)?;

        let sibling = find_next_sibling(&rows, id)
            .map(|sibling| sibling.id)
            .ok_or_else(|| ChecklistOperationError::invalid("Cannot move down: already at the bottom"))?;

        self.store.reorder_row(id, sibling, false).await?;
        self.render().await
    }
}

impl std::fmt::Debug for ChecklistOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistOperations").finish_non_exhaustive()
    }
}

fn require(rows: &[ChecklistItem], id: RowId) -> Result<(), ChecklistOperationError> {
    find_item(rows, id)
        .map(|_| ())
        .ok_or_else(|| ChecklistOperationError::not_found(id))
}
