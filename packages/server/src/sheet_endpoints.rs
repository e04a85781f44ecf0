//! Health and sheet provisioning endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/sheets` - Create an empty checklist sheet

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use checklist_core::SheetId;
use serde::{Deserialize, Serialize};

use crate::{AppState, HttpError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSheetInput {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SheetCreated {
    pub id: SheetId,
    pub name: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Provision a new sheet with the checklist columns
///
/// ```bash
/// curl -X POST http://localhost:3001/api/sheets \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Acme onboarding"}'
/// ```
async fn create_sheet(
    State(state): State<AppState>,
    body: Result<Json<CreateSheetInput>, JsonRejection>,
) -> Result<(StatusCode, Json<SheetCreated>), HttpError> {
    let Json(input) = body?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(HttpError::new("Sheet name is required", "VALIDATION_ERROR"));
    }

    let id = state.provider.create_sheet(name).await?;
    tracing::info!(sheet_id = id, name, "Provisioned sheet");

    Ok((
        StatusCode::CREATED,
        Json(SheetCreated {
            id,
            name: name.to_string(),
        }),
    ))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/sheets", post(create_sheet))
        .with_state(state)
}
