//! Checklist item endpoints
//!
//! Each endpoint runs one structural operation and answers with the whole
//! rebuilt forest of the sheet.
//!
//! # Endpoints
//!
//! - `GET /api/sheets/:sheet_id/items` - Current forest
//! - `POST /api/sheets/:sheet_id/items` - Add an item
//! - `PUT|PATCH /api/sheets/:sheet_id/items/:row_id` - Update fields
//! - `DELETE /api/sheets/:sheet_id/items/:row_id` - Delete an item
//! - `POST /api/sheets/:sheet_id/items/:row_id/indent`
//! - `POST /api/sheets/:sheet_id/items/:row_id/outdent`
//! - `POST /api/sheets/:sheet_id/items/:row_id/move-up`
//! - `POST /api/sheets/:sheet_id/items/:row_id/move-down`

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use checklist_core::{ChecklistItem, ItemUpdate, NewItem, RowId, SheetId};

use crate::{AppState, HttpError};

type Forest = Json<Vec<ChecklistItem>>;

// Rejected paths and bodies are answered as `HttpError`
type ItemPath = Result<Path<(SheetId, RowId)>, PathRejection>;
type SheetPath = Result<Path<SheetId>, PathRejection>;

/// List the checklist of a sheet
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/api/sheets/4583173393803140/items
/// ```
async fn list_items(
    State(state): State<AppState>,
    path: SheetPath,
) -> Result<Forest, HttpError> {
    let Path(sheet_id) = path?;
    let forest = state.operations(sheet_id)?.get_checklist().await?;
    Ok(Json(forest))
}

/// Add an item
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/sheets/4583173393803140/items \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Send welcome pack", "parent_id": 2331373580117892}'
/// ```
async fn create_item(
    State(state): State<AppState>,
    path: SheetPath,
    body: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Forest), HttpError> {
    let Path(sheet_id) = path?;
    let Json(item) = body?;
    let forest = state.operations(sheet_id)?.add_item(item).await?;
    Ok((StatusCode::CREATED, Json(forest)))
}

async fn update_item(
    State(state): State<AppState>,
    path: ItemPath,
    body: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let Json(update) = body?;
    let forest = state
        .operations(sheet_id)?
        .update_item(row_id, update)
        .await?;
    Ok(Json(forest))
}

async fn delete_item(
    State(state): State<AppState>,
    path: ItemPath,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let forest = state.operations(sheet_id)?.delete_item(row_id).await?;
    Ok(Json(forest))
}

async fn indent_item(
    State(state): State<AppState>,
    path: ItemPath,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let forest = state.operations(sheet_id)?.indent_item(row_id).await?;
    Ok(Json(forest))
}

async fn outdent_item(
    State(state): State<AppState>,
    path: ItemPath,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let forest = state.operations(sheet_id)?.outdent_item(row_id).await?;
    Ok(Json(forest))
}

async fn move_item_up(
    State(state): State<AppState>,
    path: ItemPath,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let forest = state.operations(sheet_id)?.move_item_up(row_id).await?;
    Ok(Json(forest))
}

async fn move_item_down(
    State(state): State<AppState>,
    path: ItemPath,
) -> Result<Forest, HttpError> {
    let Path((sheet_id, row_id)) = path?;
    let forest = state.operations(sheet_id)?.move_item_down(row_id).await?;
    Ok(Json(forest))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/sheets/:sheet_id/items",
            get(list_items).post(create_item),
        )
        .route(
            "/api/sheets/:sheet_id/items/:row_id",
            put(update_item).patch(update_item).delete(delete_item),
        )
        .route("/api/sheets/:sheet_id/items/:row_id/indent", post(indent_item))
        .route("/api/sheets/:sheet_id/items/:row_id/outdent", post(outdent_item))
        .route("/api/sheets/:sheet_id/items/:row_id/move-up", post(move_item_up))
        .route("/api/sheets/:sheet_id/items/:row_id/move-down", post(move_item_down))
        .with_state(state)
}
