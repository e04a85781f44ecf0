//! Smartsheet REST payloads and their mapping to checklist rows

use crate::gateway::RowStoreError;
use crate::models::{ChecklistItem, ItemStatus, ItemUpdate, NewItem, RowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NAME_COLUMN: &str = "Task Name";
pub const STATUS_COLUMN: &str = "Status";
pub const ASSIGNEE_COLUMN: &str = "Assignee";
pub const NOTES_COLUMN: &str = "Notes";

/// Smartsheet error codes that carry more meaning than the HTTP status
const ERROR_CODE_MAINTENANCE: i64 = 4001;
const ERROR_CODE_SERVER_TIMEOUT: i64 = 4002;
const ERROR_CODE_RATE_LIMITED: i64 = 4003;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResponse {
    #[serde(default)]
    pub columns: Vec<ColumnResponse>,
    #[serde(default)]
    pub rows: Vec<RowResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResponse {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResponse {
    pub id: RowId,
    #[serde(default)]
    pub parent_id: Option<RowId>,
    #[serde(default)]
    pub indent: Option<u32>,
    #[serde(default)]
    pub cells: Vec<CellResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResponse {
    pub column_id: i64,
    #[serde(default)]
    pub value: Value,
}

/// `{"message": "SUCCESS", "result": ...}` wrapper on write responses
#[derive(Debug, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Column ids of the four checklist columns in one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: i64,
    pub status: i64,
    pub assignee: i64,
    pub notes: i64,
}

impl ColumnMap {
    /// Resolve the checklist columns by title
    pub fn from_columns(columns: &[ColumnResponse]) -> Result<Self, RowStoreError> {
        let find = |title: &str| {
            columns
                .iter()
                .find(|column| column.title == title)
                .map(|column| column.id)
                .ok_or_else(|| {
                    RowStoreError::malformed(format!("Sheet is missing the '{}' column", title))
                })
        };

        Ok(Self {
            name: find(NAME_COLUMN)?,
            status: find(STATUS_COLUMN)?,
            assignee: find(ASSIGNEE_COLUMN)?,
            notes: find(NOTES_COLUMN)?,
        })
    }

    /// Convert one wire row into a flat checklist item
    pub fn to_item(&self, row: RowResponse) -> ChecklistItem {
        let text = |column_id: i64| {
            row.cells
                .iter()
                .find(|cell| cell.column_id == column_id)
                .map(|cell| cell_text(&cell.value))
                .unwrap_or_default()
        };

        let mut item = ChecklistItem::new(row.id, text(self.name), row.parent_id);
        item.status = parse_status(row.id, &text(self.status));
        item.assignee = text(self.assignee);
        item.notes = text(self.notes);
        item.indent = row.indent.unwrap_or(0);
        item
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_status(row_id: RowId, value: &str) -> ItemStatus {
    if value.trim().is_empty() {
        return ItemStatus::NotStarted;
    }
    value.parse().unwrap_or_else(|_| {
        tracing::warn!(row_id, status = value, "Unrecognized status value, reading as Not Started");
        ItemStatus::NotStarted
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellWrite {
    pub column_id: i64,
    pub value: String,
}

/// Body of one row in a `POST`/`PUT /sheets/{id}/rows` request
///
/// Only one location specifier (`toTop`, `toBottom`, `parentId`,
/// `siblingId`) is meaningful per request; `toBottom` may accompany
/// `parentId` to append under that parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWrite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sibling_id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_bottom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub above: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<CellWrite>>,
}

impl RowWrite {
    /// New row at the bottom of the sheet or of its parent's children
    pub fn append(item: &NewItem, columns: &ColumnMap) -> Self {
        Self {
            parent_id: item.parent_id,
            to_bottom: Some(true),
            cells: Some(vec![
                cell(columns.name, &item.name),
                cell(columns.status, item.status.as_str()),
                cell(columns.assignee, &item.assignee),
                cell(columns.notes, &item.notes),
            ]),
            ..Default::default()
        }
    }

    /// Cell changes for the supplied fields only
    pub fn update(id: RowId, update: &ItemUpdate, columns: &ColumnMap) -> Self {
        let mut cells = Vec::new();
        if let Some(name) = &update.name {
            cells.push(cell(columns.name, name));
        }
        if let Some(status) = update.status {
            cells.push(cell(columns.status, status.as_str()));
        }
        if let Some(assignee) = &update.assignee {
            cells.push(cell(columns.assignee, assignee));
        }
        if let Some(notes) = &update.notes {
            cells.push(cell(columns.notes, notes));
        }

        Self {
            id: Some(id),
            cells: Some(cells),
            ..Default::default()
        }
    }

    /// Reparent as the first child of `parent_id`, or to the top of the sheet
    ///
    /// A bare `parentId` places the row first under its new parent.
    pub fn move_to(id: RowId, parent_id: Option<RowId>) -> Self {
        match parent_id {
            Some(parent_id) => Self {
                id: Some(id),
                parent_id: Some(parent_id),
                ..Default::default()
            },
            None => Self {
                id: Some(id),
                to_top: Some(true),
                ..Default::default()
            },
        }
    }

    /// Place directly above or below a sibling
    pub fn reorder(id: RowId, sibling_id: RowId, above: bool) -> Self {
        Self {
            id: Some(id),
            sibling_id: Some(sibling_id),
            above: above.then_some(true),
            ..Default::default()
        }
    }
}

fn cell(column_id: i64, value: &str) -> CellWrite {
    CellWrite {
        column_id,
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSheet {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedSheet {
    pub id: i64,
}

impl CreateSheet {
    /// Sheet holding the four checklist columns
    pub fn checklist(name: impl Into<String>) -> Self {
        let text = |title: &'static str| ColumnSpec {
            title,
            kind: "TEXT_NUMBER",
            primary: false,
            options: Vec::new(),
        };

        Self {
            name: name.into(),
            columns: vec![
                ColumnSpec {
                    primary: true,
                    ..text(NAME_COLUMN)
                },
                ColumnSpec {
                    title: STATUS_COLUMN,
                    kind: "PICKLIST",
                    primary: false,
                    options: ItemStatus::ALL.iter().map(|status| status.as_str()).collect(),
                },
                text(ASSIGNEE_COLUMN),
                text(NOTES_COLUMN),
            ],
        }
    }
}

/// Map a failed HTTP response to a row store error
///
/// `not_found` is the error to report for a 404, since only the caller knows
/// whether the request addressed a sheet or a row.
pub fn error_from_response(status: u16, body: &str, not_found: RowStoreError) -> RowStoreError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let error_code = parsed.as_ref().and_then(|error| error.error_code);
    let message = match &parsed {
        Some(error) if !error.message.is_empty() => error.message.clone(),
        _ if body.trim().is_empty() => format!("HTTP {}", status),
        _ => body.trim().to_string(),
    };

    match (status, error_code) {
        (404, _) => not_found,
        (429, _) | (_, Some(ERROR_CODE_RATE_LIMITED)) => RowStoreError::RateLimited,
        (503, _) | (_, Some(ERROR_CODE_MAINTENANCE)) => RowStoreError::Unavailable(message),
        (504, _) | (_, Some(ERROR_CODE_SERVER_TIMEOUT)) => RowStoreError::Timeout,
        (401, _) | (403, _) => RowStoreError::Unauthorized(message),
        _ => RowStoreError::Api {
            status,
            error_code,
            message,
        },
    }
}
