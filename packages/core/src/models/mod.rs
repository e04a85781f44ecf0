//! Data Models
//!
//! This module contains the data structures shared by every layer:
//!
//! - `ChecklistItem` - one outline row, plus its reconstructed `children`
//! - `ItemStatus` - the fixed status picklist
//! - `NewItem` / `ItemUpdate` - input payloads for add and partial update
//!
//! Items are plain values. The tree built from them is rebuilt for every
//! response and never persisted.

mod checklist_item;
mod item_input;

pub use checklist_item::{ChecklistItem, ItemStatus, RowId};
pub use item_input::{ItemUpdate, NewItem, ValidationError, MAX_FIELD_LENGTH};
