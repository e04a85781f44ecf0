//! In-process row store
//!
//! `InMemoryRowStore` behaves like the remote sheet it stands in for: rows
//! live in display order (each row followed by its descendants), ids come
//! from a counter, and every move carries the row's whole subtree. It also
//! records each call it receives so tests can check which remote requests an
//! operation issued.

use super::{RowStore, RowStoreError, RowStoreProvider, SheetId};
use crate::models::{ChecklistItem, ItemUpdate, NewItem, RowId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard};

/// A request received by [`InMemoryRowStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetRows,
    AddRow {
        name: String,
        parent_id: Option<RowId>,
    },
    UpdateRow {
        id: RowId,
        update: ItemUpdate,
    },
    DeleteRow {
        id: RowId,
    },
    MoveRow {
        id: RowId,
        parent_id: Option<RowId>,
    },
    ReorderRow {
        id: RowId,
        sibling_id: RowId,
        above: bool,
    },
}

impl StoreCall {
    /// True for every call except `GetRows`
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StoreCall::GetRows)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<ChecklistItem>,
    next_id: RowId,
    calls: Vec<StoreCall>,
    fail_next: Option<RowStoreError>,
}

/// Row store kept in process memory
#[derive(Debug)]
pub struct InMemoryRowStore {
    state: Mutex<MemoryState>,
}

impl InMemoryRowStore {
    /// Empty sheet; the first row gets id 1
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Sheet seeded with `rows` exactly as given
    ///
    /// No validation happens here, so snapshots with orphans or parent cycles
    /// can be reproduced. New ids continue after the largest seeded id.
    pub fn with_rows(rows: Vec<ChecklistItem>) -> Self {
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.children.clear();
                row
            })
            .collect();

        Self {
            state: Mutex::new(MemoryState {
                rows,
                next_id,
                ..Default::default()
            }),
        }
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    /// Calls that would have changed the sheet
    pub fn mutation_calls(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(StoreCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut state) = self.lock() {
            state.calls.clear();
        }
    }

    /// Make the next call fail with `error` (after it is recorded)
    pub fn fail_next(&self, error: RowStoreError) {
        if let Ok(mut state) = self.lock() {
            state.fail_next = Some(error);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RowStoreError> {
        self.state
            .lock()
            .map_err(|_| RowStoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    /// Lock, record `call`, and fire any armed failure
    fn begin(&self, call: StoreCall) -> Result<MutexGuard<'_, MemoryState>, RowStoreError> {
        let mut state = self.lock()?;
        state.calls.push(call);
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state)
    }
}

impl Default for InMemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn get_rows(&self) -> Result<Vec<ChecklistItem>, RowStoreError> {
        let state = self.begin(StoreCall::GetRows)?;

        let parents: HashMap<RowId, Option<RowId>> =
            state.rows.iter().map(|row| (row.id, row.parent_id)).collect();

        Ok(state
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.indent = depth(&parents, row.parent_id);
                row
            })
            .collect())
    }

    async fn add_row(&self, item: NewItem) -> Result<ChecklistItem, RowStoreError> {
        let mut state = self.begin(StoreCall::AddRow {
            name: item.name.clone(),
            parent_id: item.parent_id,
        })?;

        let at = match item.parent_id {
            Some(parent_id) => {
                let parent = position(&state.rows, parent_id)
                    .ok_or_else(|| RowStoreError::row_not_found(parent_id))?;
                subtree_range(&state.rows, parent).end
            }
            None => state.rows.len(),
        };

        let id = state.next_id;
        state.next_id += 1;

        let mut row = ChecklistItem::new(id, item.name, item.parent_id);
        row.status = item.status;
        row.assignee = item.assignee;
        row.notes = item.notes;
        state.rows.insert(at, row);

        Ok(row_view(&state.rows, at))
    }

    async fn update_row(
        &self,
        id: RowId,
        update: ItemUpdate,
    ) -> Result<ChecklistItem, RowStoreError> {
        let mut state = self.begin(StoreCall::UpdateRow {
            id,
            update: update.clone(),
        })?;

        let at = position(&state.rows, id).ok_or_else(|| RowStoreError::row_not_found(id))?;
        let row = &mut state.rows[at];
        if let Some(name) = update.name {
            row.name = name;
        }
        if let Some(status) = update.status {
            row.status = status;
        }
        if let Some(assignee) = update.assignee {
            row.assignee = assignee;
        }
        if let Some(notes) = update.notes {
            row.notes = notes;
        }

        Ok(row_view(&state.rows, at))
    }

    async fn delete_row(&self, id: RowId) -> Result<(), RowStoreError> {
        let mut state = self.begin(StoreCall::DeleteRow { id })?;

        let at = position(&state.rows, id).ok_or_else(|| RowStoreError::row_not_found(id))?;
        if state.rows.iter().any(|row| row.parent_id == Some(id)) {
            return Err(RowStoreError::rejected(format!(
                "Row {} has children; delete or move them first",
                id
            )));
        }
        state.rows.remove(at);
        Ok(())
    }

    async fn move_row(
        &self,
        id: RowId,
        parent_id: Option<RowId>,
    ) -> Result<ChecklistItem, RowStoreError> {
        let mut state = self.begin(StoreCall::MoveRow { id, parent_id })?;

        if position(&state.rows, id).is_none() {
            return Err(RowStoreError::row_not_found(id));
        }
        if let Some(new_parent) = parent_id {
            if position(&state.rows, new_parent).is_none() {
                return Err(RowStoreError::row_not_found(new_parent));
            }
            if is_in_subtree(&state.rows, id, new_parent) {
                return Err(RowStoreError::rejected(format!(
                    "Cannot move row {} under itself or its descendant {}",
                    id, new_parent
                )));
            }
        }

        let mut block = take_subtree(&mut state.rows, id);
        block[0].parent_id = parent_id;

        let at = match parent_id {
            Some(new_parent) => match position(&state.rows, new_parent) {
                Some(parent) => parent + 1,
                None => return Err(RowStoreError::row_not_found(new_parent)),
            },
            None => 0,
        };
        state.rows.splice(at..at, block);

        Ok(row_view(&state.rows, at))
    }

    async fn reorder_row(
        &self,
        id: RowId,
        sibling_id: RowId,
        above: bool,
    ) -> Result<ChecklistItem, RowStoreError> {
        let mut state = self.begin(StoreCall::ReorderRow {
            id,
            sibling_id,
            above,
        })?;

        let row = position(&state.rows, id).ok_or_else(|| RowStoreError::row_not_found(id))?;
        let sibling = position(&state.rows, sibling_id)
            .ok_or_else(|| RowStoreError::row_not_found(sibling_id))?;
        if id == sibling_id || state.rows[row].parent_id != state.rows[sibling].parent_id {
            return Err(RowStoreError::rejected(format!(
                "Row {} is not a sibling of row {}",
                sibling_id, id
            )));
        }

        let block = take_subtree(&mut state.rows, id);
        let sibling = match position(&state.rows, sibling_id) {
            Some(sibling) => sibling,
            None => return Err(RowStoreError::row_not_found(sibling_id)),
        };
        let at = if above {
            sibling
        } else {
            subtree_range(&state.rows, sibling).end
        };
        state.rows.splice(at..at, block);

        Ok(row_view(&state.rows, at))
    }
}

fn position(rows: &[ChecklistItem], id: RowId) -> Option<usize> {
    rows.iter().position(|row| row.id == id)
}

/// Rows `start..end` holding the row at `start` and its descendants
///
/// Relies on display order: descendants directly follow their ancestor.
fn subtree_range(rows: &[ChecklistItem], start: usize) -> Range<usize> {
    let mut members: HashSet<RowId> = HashSet::from([rows[start].id]);
    let mut end = start + 1;
    while end < rows.len() {
        match rows[end].parent_id {
            Some(parent) if members.contains(&parent) => {
                members.insert(rows[end].id);
                end += 1;
            }
            _ => break,
        }
    }
    start..end
}

fn take_subtree(rows: &mut Vec<ChecklistItem>, id: RowId) -> Vec<ChecklistItem> {
    match position(rows, id) {
        Some(start) => {
            let range = subtree_range(rows, start);
            rows.drain(range).collect()
        }
        None => Vec::new(),
    }
}

/// True when `candidate` is `root` or one of its descendants
fn is_in_subtree(rows: &[ChecklistItem], root: RowId, candidate: RowId) -> bool {
    let mut current = Some(candidate);
    for _ in 0..=rows.len() {
        match current {
            Some(id) if id == root => return true,
            Some(id) => current = rows.iter().find(|row| row.id == id).and_then(|row| row.parent_id),
            None => return false,
        }
    }
    false
}

/// Depth from the parent chain, bounded so a corrupt chain cannot loop
fn depth(parents: &HashMap<RowId, Option<RowId>>, mut parent: Option<RowId>) -> u32 {
    let mut depth = 0;
    while let Some(id) = parent {
        if depth as usize >= parents.len() {
            break;
        }
        match parents.get(&id) {
            Some(next) => {
                depth += 1;
                parent = *next;
            }
            None => break,
        }
    }
    depth
}

fn row_view(rows: &[ChecklistItem], at: usize) -> ChecklistItem {
    let parents: HashMap<RowId, Option<RowId>> =
        rows.iter().map(|row| (row.id, row.parent_id)).collect();
    let mut row = rows[at].clone();
    row.indent = depth(&parents, row.parent_id);
    row
}

/// A set of in-memory sheets, keyed by sheet id
#[derive(Debug)]
pub struct InMemoryWorkspace {
    sheets: Mutex<HashMap<SheetId, Arc<InMemoryRowStore>>>,
    next_sheet_id: Mutex<SheetId>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self {
            sheets: Mutex::new(HashMap::new()),
            next_sheet_id: Mutex::new(1),
        }
    }

    /// Register `store` under `sheet_id`, replacing any previous sheet
    pub fn insert_sheet(&self, sheet_id: SheetId, store: Arc<InMemoryRowStore>) {
        if let Ok(mut sheets) = self.sheets.lock() {
            sheets.insert(sheet_id, store);
        }
        if let Ok(mut next) = self.next_sheet_id.lock() {
            *next = (*next).max(sheet_id + 1);
        }
    }

    /// The concrete store behind `sheet_id`, for inspecting recorded calls
    pub fn sheet(&self, sheet_id: SheetId) -> Option<Arc<InMemoryRowStore>> {
        self.sheets
            .lock()
            .ok()
            .and_then(|sheets| sheets.get(&sheet_id).cloned())
    }
}

impl Default for InMemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowStoreProvider for InMemoryWorkspace {
    fn open_sheet(&self, sheet_id: SheetId) -> Result<Arc<dyn RowStore>, RowStoreError> {
        let store = self
            .sheet(sheet_id)
            .ok_or_else(|| RowStoreError::sheet_not_found(sheet_id))?;
        Ok(store)
    }

    async fn create_sheet(&self, name: &str) -> Result<SheetId, RowStoreError> {
        let sheet_id = {
            let mut next = self
                .next_sheet_id
                .lock()
                .map_err(|_| RowStoreError::Unavailable("workspace lock poisoned".to_string()))?;
            let id = *next;
            *next += 1;
            id
        };
        self.insert_sheet(sheet_id, Arc::new(InMemoryRowStore::new()));
        tracing::info!(sheet_id, name, "Created in-memory sheet");
        Ok(sheet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemStatus;

    fn item(id: RowId, parent_id: Option<RowId>) -> ChecklistItem {
        ChecklistItem::new(id, format!("Item {}", id), parent_id)
    }

    async fn order(store: &InMemoryRowStore) -> Vec<(RowId, Option<RowId>)> {
        store
            .get_rows()
            .await
            .unwrap()
            .into_iter()
            .map(|row| (row.id, row.parent_id))
            .collect()
    }

    /// ```text
    /// 1
    /// ├── 2
    /// │   └── 3
    /// └── 4
    /// 5
    /// ```
    fn seeded() -> InMemoryRowStore {
        InMemoryRowStore::with_rows(vec![
            item(1, None),
            item(2, Some(1)),
            item(3, Some(2)),
            item(4, Some(1)),
            item(5, None),
        ])
    }

    #[tokio::test]
    async fn test_add_row_appends_root_and_child() {
        let store = seeded();

        let root = store.add_row(NewItem::new("Root")).await.unwrap();
        assert_eq!(root.id, 6);
        assert_eq!(root.indent, 0);

        let child = store.add_row(NewItem::new("Child").with_parent(1)).await.unwrap();
        assert_eq!(child.id, 7);
        assert_eq!(child.indent, 1);

        assert_eq!(
            order(&store).await,
            vec![
                (1, None),
                (2, Some(1)),
                (3, Some(2)),
                (4, Some(1)),
                (7, Some(1)),
                (5, None),
                (6, None),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_row_with_missing_parent() {
        let store = seeded();
        let result = store.add_row(NewItem::new("Lost").with_parent(99)).await;
        assert_eq!(result, Err(RowStoreError::row_not_found(99)));
    }

    #[tokio::test]
    async fn test_get_rows_reports_indent() {
        let store = seeded();
        let indents: Vec<u32> = store
            .get_rows()
            .await
            .unwrap()
            .iter()
            .map(|row| row.indent)
            .collect();
        assert_eq!(indents, vec![0, 1, 2, 1, 0]);
    }

    #[tokio::test]
    async fn test_update_row_merges_fields() {
        let store = seeded();
        store
            .update_row(
                2,
                ItemUpdate {
                    assignee: Some("sam".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_row(
                2,
                ItemUpdate {
                    status: Some(ItemStatus::Complete),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Item 2");
        assert_eq!(updated.assignee, "sam");
        assert_eq!(updated.status, ItemStatus::Complete);
    }

    #[tokio::test]
    async fn test_delete_row_with_children_is_rejected() {
        let store = seeded();

        let result = store.delete_row(2).await;
        assert!(matches!(result, Err(RowStoreError::Rejected { .. })));
        assert_eq!(order(&store).await.len(), 5);

        store.delete_row(3).await.unwrap();
        store.delete_row(2).await.unwrap();
        assert_eq!(
            order(&store).await,
            vec![(1, None), (4, Some(1)), (5, None)]
        );

        assert_eq!(store.delete_row(2).await, Err(RowStoreError::row_not_found(2)));
    }

    #[tokio::test]
    async fn test_move_row_carries_subtree_to_first_child() {
        let store = seeded();

        let moved = store.move_row(2, Some(5)).await.unwrap();
        assert_eq!(moved.parent_id, Some(5));
        assert_eq!(moved.indent, 1);

        assert_eq!(
            order(&store).await,
            vec![(1, None), (4, Some(1)), (5, None), (2, Some(5)), (3, Some(2))]
        );
    }

    #[tokio::test]
    async fn test_move_row_goes_ahead_of_existing_children() {
        let store = seeded();

        store.move_row(4, Some(2)).await.unwrap();
        assert_eq!(
            order(&store).await,
            vec![(1, None), (2, Some(1)), (4, Some(2)), (3, Some(2)), (5, None)]
        );
    }

    #[tokio::test]
    async fn test_move_row_to_root_goes_to_top() {
        let store = seeded();

        store.move_row(4, None).await.unwrap();
        assert_eq!(
            order(&store).await,
            vec![(4, None), (1, None), (2, Some(1)), (3, Some(2)), (5, None)]
        );
    }

    #[tokio::test]
    async fn test_move_row_under_own_descendant_is_rejected() {
        let store = seeded();

        assert!(matches!(
            store.move_row(1, Some(3)).await,
            Err(RowStoreError::Rejected { .. })
        ));
        assert!(matches!(
            store.move_row(2, Some(2)).await,
            Err(RowStoreError::Rejected { .. })
        ));
        assert_eq!(store.move_row(2, Some(99)).await, Err(RowStoreError::row_not_found(99)));
    }

    #[tokio::test]
    async fn test_reorder_row_above_and_below() {
        let store = seeded();

        // 4 above 2: the subtree of 2 follows 4
        store.reorder_row(4, 2, true).await.unwrap();
        assert_eq!(
            order(&store).await,
            vec![(1, None), (4, Some(1)), (2, Some(1)), (3, Some(2)), (5, None)]
        );

        // 1 below 5: the whole subtree of 1 lands after 5
        store.reorder_row(1, 5, false).await.unwrap();
        assert_eq!(
            order(&store).await,
            vec![(5, None), (1, None), (4, Some(1)), (2, Some(1)), (3, Some(2))]
        );
    }

    #[tokio::test]
    async fn test_reorder_row_requires_sibling() {
        let store = seeded();

        assert!(matches!(
            store.reorder_row(3, 4, true).await,
            Err(RowStoreError::Rejected { .. })
        ));
        assert!(matches!(
            store.reorder_row(2, 2, true).await,
            Err(RowStoreError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_calls_are_recorded_and_failures_injected() {
        let store = seeded();

        store.fail_next(RowStoreError::RateLimited);
        assert_eq!(store.get_rows().await, Err(RowStoreError::RateLimited));
        assert!(store.get_rows().await.is_ok());

        store.move_row(4, None).await.unwrap();
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::GetRows,
                StoreCall::GetRows,
                StoreCall::MoveRow {
                    id: 4,
                    parent_id: None
                },
            ]
        );
        assert_eq!(store.mutation_calls().len(), 1);

        store.clear_calls();
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_workspace_opens_and_creates_sheets() {
        let workspace = InMemoryWorkspace::new();
        workspace.insert_sheet(10, Arc::new(seeded()));

        let store = workspace.open_sheet(10).unwrap();
        assert_eq!(store.get_rows().await.unwrap().len(), 5);

        let created = workspace.create_sheet("Groceries").await.unwrap();
        assert_eq!(created, 11);
        assert!(workspace.open_sheet(created).unwrap().get_rows().await.unwrap().is_empty());

        assert!(matches!(
            workspace.open_sheet(404),
            Err(RowStoreError::SheetNotFound { sheet_id: 404 })
        ));
    }
}
