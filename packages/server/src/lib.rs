//! HTTP server for hierarchical checklists
//!
//! Exposes the checklist operations of `checklist-core` as a JSON REST API.
//! Sheets are addressed by their row store sheet id; one row store credential
//! is configured for the whole process.
//!
//! # Architecture
//!
//! Endpoints are grouped into modules that each contribute a router:
//! - `sheet_endpoints`: health check and sheet provisioning
//! - `item_endpoints`: the structural checklist operations
//!
//! # Usage
//!
//! ```bash
//! # Smartsheet backend
//! SMARTSHEET_ACCESS_TOKEN=... cargo run --bin checklist-server
//!
//! # In-memory backend for local UI work
//! CHECKLIST_STORE=memory cargo run --bin checklist-server
//! ```

use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use checklist_core::{ChecklistOperations, RowStoreProvider, SheetId};

pub mod config;
mod http_error;
mod item_endpoints;
mod sheet_endpoints;

pub use config::{ServerConfig, StoreBackend};
pub use http_error::HttpError;
pub use sheet_endpoints::SheetCreated;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RowStoreProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn RowStoreProvider>) -> Self {
        Self { provider }
    }

    /// Operations bound to one sheet, built per request
    pub fn operations(&self, sheet_id: SheetId) -> Result<ChecklistOperations, HttpError> {
        let store = self.provider.open_sheet(sheet_id)?;
        Ok(ChecklistOperations::new(store))
    }
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(sheet_endpoints::routes(state.clone()))
        .merge(item_endpoints::routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS layer for the configured browser origins
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<header::HeaderValue>()
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .allow_credentials(false))
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns error if the CORS configuration is invalid or the server fails to
/// bind or start.
pub async fn start_server(
    provider: Arc<dyn RowStoreProvider>,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(AppState::new(provider), cors_layer(&config.cors_origins)?);

    let addr = format!("127.0.0.1:{}", config.port);
    tracing::info!("Checklist server starting on http://{}", addr);
    tracing::info!("Row store backend: {:?}", config.backend);
    tracing::info!("CORS enabled for {}", config.cors_origins.join(", "));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
