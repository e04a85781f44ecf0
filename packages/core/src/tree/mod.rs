//! Outline Tree
//!
//! The row store only knows a flat, ordered list of rows with parent
//! pointers. This module turns such a snapshot into a forest and answers the
//! neighbour queries the structural operations need:
//!
//! - [`build_forest`] - flat snapshot → ordered roots with nested `children`
//! - [`find_previous_sibling`] / [`find_next_sibling`] - same-parent neighbours
//! - [`find_parent`] - parent lookup by `parent_id`
//!
//! Sibling order is always the order rows appear in the snapshot.

mod builder;
mod locator;

pub use builder::build_forest;
pub use locator::{find_item, find_next_sibling, find_parent, find_previous_sibling};
