//! Forest reconstruction from a flat snapshot.

use crate::models::{ChecklistItem, RowId};
use std::collections::HashMap;

/// Build the forest of roots from a flat snapshot
///
/// Uses an adjacency list over snapshot positions:
/// 1. Index every row by id (first occurrence wins on duplicate ids)
/// 2. Distribute each row into its parent's child list, or into the roots
///    when `parent_id` is `None` or does not resolve (orphan-as-root)
/// 3. Assemble owned subtrees bottom-up
///
/// Children keep the relative order they had in the snapshot.
///
/// Rows sitting on a parent cycle are unreachable from any root. The first
/// such row in snapshot order is detached from its parent and promoted to a
/// root, which pulls the rest of its cycle in below it; this repeats until
/// every row is reachable. Each promotion is logged as a warning. Every
/// input row therefore appears exactly once in the output.
pub fn build_forest(items: Vec<ChecklistItem>) -> Vec<ChecklistItem> {
    let len = items.len();

    let mut index: HashMap<RowId, usize> = HashMap::with_capacity(len);
    for (position, item) in items.iter().enumerate() {
        index.entry(item.id).or_insert(position);
    }

    let mut parent_of: Vec<Option<usize>> = items
        .iter()
        .map(|item| item.parent_id.and_then(|pid| index.get(&pid).copied()))
        .collect();

    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); len];
    let mut roots: Vec<usize> = Vec::new();
    for position in 0..len {
        match parent_of[position] {
            Some(parent) => children_of[parent].push(position),
            None => roots.push(position),
        }
    }

    let mut reachable = vec![false; len];
    for &root in &roots {
        mark_reachable(root, &children_of, &mut reachable);
    }

    for position in 0..len {
        if reachable[position] {
            continue;
        }
        if let Some(parent) = parent_of[position].take() {
            children_of[parent].retain(|&child| child != position);
        }
        tracing::warn!(
            row_id = items[position].id,
            parent_id = ?items[position].parent_id,
            "Row is part of a parent cycle, promoting it to root"
        );
        let at = roots.partition_point(|&root| root < position);
        roots.insert(at, position);
        mark_reachable(position, &children_of, &mut reachable);
    }

    assemble(items, &roots, &children_of)
}

fn mark_reachable(start: usize, children_of: &[Vec<usize>], reachable: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(position) = stack.pop() {
        if reachable[position] {
            continue;
        }
        reachable[position] = true;
        stack.extend(children_of[position].iter().copied());
    }
}

/// Move rows into their parents in post-order so no recursion is needed for
/// deep outlines.
fn assemble(
    items: Vec<ChecklistItem>,
    roots: &[usize],
    children_of: &[Vec<usize>],
) -> Vec<ChecklistItem> {
    let mut slots: Vec<Option<ChecklistItem>> = items.into_iter().map(Some).collect();

    let mut forest = Vec::with_capacity(roots.len());
    for &root in roots {
        let mut stack: Vec<(usize, bool)> = vec![(root, false)];
        while let Some((position, expanded)) = stack.pop() {
            if !expanded {
                stack.push((position, true));
                for &child in children_of[position].iter().rev() {
                    stack.push((child, false));
                }
                continue;
            }

            let children: Vec<ChecklistItem> = children_of[position]
                .iter()
                .filter_map(|&child| slots[child].take())
                .collect();
            if let Some(item) = slots[position].as_mut() {
                item.children = children;
            }
        }
        if let Some(item) = slots[root].take() {
            forest.push(item);
        }
    }
    forest
}
