//! Row store gateway
//!
//! The contract the structural operations are written against, plus the two
//! implementations: an in-process store and the Smartsheet REST client.

mod error;
mod memory;
mod row_store;
pub mod smartsheet;

pub use error::RowStoreError;
pub use memory::{InMemoryRowStore, InMemoryWorkspace, StoreCall};
pub use row_store::{RowStore, RowStoreProvider, SheetId};
pub use smartsheet::{SmartsheetClient, SmartsheetStore};
