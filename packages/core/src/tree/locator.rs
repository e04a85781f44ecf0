//! Sibling and parent lookups over a flat snapshot.
//!
//! Siblings are rows with equal `parent_id` (two roots are siblings). The
//! `indent` hint is never consulted. Every query is a linear scan of the
//! snapshot it is given; nothing is cached between calls.

use crate::models::{ChecklistItem, RowId};

/// Find a row by id
pub fn find_item(items: &[ChecklistItem], id: RowId) -> Option<&ChecklistItem> {
    items.iter().find(|item| item.id == id)
}

/// Row immediately above `id` among its siblings
///
/// Returns `None` when the row is the first of its siblings or is not in the
/// snapshot.
pub fn find_previous_sibling(items: &[ChecklistItem], id: RowId) -> Option<&ChecklistItem> {
    let target = find_item(items, id)?;

    let mut previous = None;
    for item in items.iter().filter(|item| item.parent_id == target.parent_id) {
        if item.id == id {
            return previous;
        }
        previous = Some(item);
    }
    None
}

/// Row immediately below `id` among its siblings
///
/// Returns `None` when the row is the last of its siblings or is not in the
/// snapshot.
pub fn find_next_sibling(items: &[ChecklistItem], id: RowId) -> Option<&ChecklistItem> {
    let target = find_item(items, id)?;

    let mut siblings = items
        .iter()
        .filter(|item| item.parent_id == target.parent_id)
        .skip_while(|item| item.id != id);
    siblings.next()?;
    siblings.next()
}

/// Parent row of `id`
///
/// Returns `None` for roots, for rows whose parent is not in the snapshot and
/// for ids that are not in the snapshot.
pub fn find_parent(items: &[ChecklistItem], id: RowId) -> Option<&ChecklistItem> {
    let parent_id = find_item(items, id)?.parent_id?;
    find_item(items, parent_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: RowId, parent_id: Option<RowId>) -> ChecklistItem {
        ChecklistItem::new(id, format!("Item {}", id), parent_id)
    }

    /// ```text
    /// 1
    /// ├── 2
    /// │   └── 3
    /// ├── 4
    /// └── 5
    /// 6
    /// ```
    fn outline() -> Vec<ChecklistItem> {
        vec![
            item(1, None),
            item(2, Some(1)),
            item(3, Some(2)),
            item(4, Some(1)),
            item(5, Some(1)),
            item(6, None),
        ]
    }

    fn id_of(found: Option<&ChecklistItem>) -> Option<RowId> {
        found.map(|item| item.id)
    }

    #[test]
    fn test_previous_sibling() {
        let items = outline();

        assert_eq!(id_of(find_previous_sibling(&items, 2)), None);
        assert_eq!(id_of(find_previous_sibling(&items, 4)), Some(2));
        assert_eq!(id_of(find_previous_sibling(&items, 5)), Some(4));
        assert_eq!(id_of(find_previous_sibling(&items, 3)), None);
    }

    #[test]
    fn test_previous_sibling_among_roots() {
        let items = outline();

        assert_eq!(id_of(find_previous_sibling(&items, 1)), None);
        // Descendants of 1 sit between the two roots but are not siblings
        assert_eq!(id_of(find_previous_sibling(&items, 6)), Some(1));
    }

    #[test]
    fn test_next_sibling() {
        let items = outline();

        assert_eq!(id_of(find_next_sibling(&items, 2)), Some(4));
        assert_eq!(id_of(find_next_sibling(&items, 4)), Some(5));
        assert_eq!(id_of(find_next_sibling(&items, 5)), None);
        assert_eq!(id_of(find_next_sibling(&items, 3)), None);
        assert_eq!(id_of(find_next_sibling(&items, 1)), Some(6));
        assert_eq!(id_of(find_next_sibling(&items, 6)), None);
    }

    #[test]
    fn test_missing_target() {
        let items = outline();

        assert!(find_previous_sibling(&items, 42).is_none());
        assert!(find_next_sibling(&items, 42).is_none());
        assert!(find_parent(&items, 42).is_none());
        assert!(find_item(&items, 42).is_none());
    }

    #[test]
    fn test_siblings_ignore_indent_hint() {
        let mut items = vec![item(1, None), item(2, None), item(3, None)];
        items[1].indent = 4;

        assert_eq!(id_of(find_previous_sibling(&items, 2)), Some(1));
        assert_eq!(id_of(find_next_sibling(&items, 2)), Some(3));
    }

    #[test]
    fn test_orphans_share_dangling_parent() {
        let items = vec![item(1, Some(99)), item(2, None), item(3, Some(99))];

        assert_eq!(id_of(find_previous_sibling(&items, 3)), Some(1));
        assert_eq!(id_of(find_previous_sibling(&items, 2)), None);
        assert!(find_parent(&items, 1).is_none());
    }

    #[test]
    fn test_parent() {
        let items = outline();

        assert_eq!(id_of(find_parent(&items, 3)), Some(2));
        assert_eq!(id_of(find_parent(&items, 2)), Some(1));
        assert_eq!(id_of(find_parent(&items, 5)), Some(1));
        assert!(find_parent(&items, 1).is_none());
        assert!(find_parent(&items, 6).is_none());
    }
}
