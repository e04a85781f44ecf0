//! Row store over one Smartsheet sheet

use super::client::SmartsheetClient;
use super::wire::{ColumnMap, ResultEnvelope, RowResponse, RowWrite};
use crate::gateway::{RowStore, RowStoreError, SheetId};
use crate::models::{ChecklistItem, ItemUpdate, NewItem, RowId};
use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::OnceCell;
use tracing::instrument;

/// [`RowStore`] backed by one Smartsheet sheet
///
/// The sheet's column ids are looked up on first use and cached for the
/// lifetime of the store.
#[derive(Debug)]
pub struct SmartsheetStore {
    client: SmartsheetClient,
    sheet_id: SheetId,
    columns: OnceCell<ColumnMap>,
}

impl SmartsheetStore {
    pub fn new(client: SmartsheetClient, sheet_id: SheetId) -> Self {
        Self {
            client,
            sheet_id,
            columns: OnceCell::new(),
        }
    }

    pub fn sheet_id(&self) -> SheetId {
        self.sheet_id
    }

    async fn columns(&self) -> Result<&ColumnMap, RowStoreError> {
        self.columns
            .get_or_try_init(|| async {
                let sheet = self.client.get_sheet(self.sheet_id).await?;
                ColumnMap::from_columns(&sheet.columns)
            })
            .await
    }

    fn rows_path(&self) -> String {
        format!("sheets/{}/rows", self.sheet_id)
    }

    /// `PUT` a single row change and read back the written row
    async fn put_row(&self, id: RowId, write: RowWrite) -> Result<ChecklistItem, RowStoreError> {
        let columns = self.columns().await?;
        let response: ResultEnvelope<Vec<RowResponse>> = self
            .client
            .send(
                Method::PUT,
                &self.rows_path(),
                Some(&[write]),
                RowStoreError::row_not_found(id),
            )
            .await?;

        first_row(response.result, columns)
    }
}

fn first_row(rows: Vec<RowResponse>, columns: &ColumnMap) -> Result<ChecklistItem, RowStoreError> {
    rows.into_iter()
        .next()
        .map(|row| columns.to_item(row))
        .ok_or_else(|| RowStoreError::malformed("Response contained no rows"))
}

#[async_trait]
impl RowStore for SmartsheetStore {
    #[instrument(skip(self), fields(sheet_id = self.sheet_id))]
    async fn get_rows(&self) -> Result<Vec<ChecklistItem>, RowStoreError> {
        let sheet = self.client.get_sheet(self.sheet_id).await?;
        let columns = self
            .columns
            .get_or_try_init(|| async { ColumnMap::from_columns(&sheet.columns) })
            .await?;

        let rows: Vec<ChecklistItem> = sheet
            .rows
            .into_iter()
            .map(|row| columns.to_item(row))
            .collect();
        tracing::debug!(count = rows.len(), "Fetched rows");
        Ok(rows)
    }

    #[instrument(skip(self, item), fields(sheet_id = self.sheet_id, parent_id = ?item.parent_id))]
    async fn add_row(&self, item: NewItem) -> Result<ChecklistItem, RowStoreError> {
        let columns = self.columns().await?;
        let missing = match item.parent_id {
            Some(parent_id) => RowStoreError::row_not_found(parent_id),
            None => RowStoreError::sheet_not_found(self.sheet_id),
        };
        let response: ResultEnvelope<Vec<RowResponse>> = self
            .client
            .send(
                Method::POST,
                &self.rows_path(),
                Some(&[RowWrite::append(&item, columns)]),
                missing,
            )
            .await?;

        let row = first_row(response.result, columns)?;
        tracing::info!(row_id = row.id, "Added row");
        Ok(row)
    }

    #[instrument(skip(self, update), fields(sheet_id = self.sheet_id))]
    async fn update_row(&self, id: RowId, update: ItemUpdate) -> Result<ChecklistItem, RowStoreError> {
        if update.is_empty() {
            let columns = self.columns().await?;
            let row: RowResponse = self
                .client
                .send(
                    Method::GET,
                    &format!("{}/{}", self.rows_path(), id),
                    None::<&()>,
                    RowStoreError::row_not_found(id),
                )
                .await?;
            return Ok(columns.to_item(row));
        }

        let columns = self.columns().await?;
        let row = self.put_row(id, RowWrite::update(id, &update, columns)).await?;
        tracing::info!("Updated row");
        Ok(row)
    }

    #[instrument(skip(self), fields(sheet_id = self.sheet_id))]
    async fn delete_row(&self, id: RowId) -> Result<(), RowStoreError> {
        let _: serde_json::Value = self
            .client
            .send(
                Method::DELETE,
                &format!("{}?ids={}", self.rows_path(), id),
                None::<&()>,
                RowStoreError::row_not_found(id),
            )
            .await?;

        tracing::info!("Deleted row");
        Ok(())
    }

    #[instrument(skip(self), fields(sheet_id = self.sheet_id))]
    async fn move_row(&self, id: RowId, parent_id: Option<RowId>) -> Result<ChecklistItem, RowStoreError> {
        let row = self.put_row(id, RowWrite::move_to(id, parent_id)).await?;
        tracing::info!("Moved row");
        Ok(row)
    }

    #[instrument(skip(self), fields(sheet_id = self.sheet_id))]
    async fn reorder_row(
        &self,
        id: RowId,
        sibling_id: RowId,
        above: bool,
    ) -> Result<ChecklistItem, RowStoreError> {
        let row = self
            .put_row(id, RowWrite::reorder(id, sibling_id, above))
            .await?;
        tracing::info!("Reordered row");
        Ok(row)
    }
}
