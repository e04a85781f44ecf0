//! Smartsheet REST API 2.0 row store

mod client;
mod store;
mod wire;

pub use client::SmartsheetClient;
pub use store::SmartsheetStore;
pub use wire::{error_from_response, ColumnMap, RowWrite};
