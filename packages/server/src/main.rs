//! Checklist HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! SMARTSHEET_ACCESS_TOKEN=... cargo run --bin checklist-server
//!
//! # Custom port, in-memory sheets
//! CHECKLIST_SERVER_PORT=3002 CHECKLIST_STORE=memory cargo run --bin checklist-server
//! ```
//!
//! # Environment Variables
//!
//! - `CHECKLIST_SERVER_PORT`: Server port (default: 3001)
//! - `CHECKLIST_STORE`: `smartsheet` (default) or `memory`
//! - `CORS_ALLOW_ORIGIN`: Comma separated browser origins
//! - `SMARTSHEET_ACCESS_TOKEN`, `SMARTSHEET_API_BASE`, `SMARTSHEET_TIMEOUT_SECS`
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::sync::Arc;

use checklist_core::gateway::{InMemoryWorkspace, SmartsheetClient};
use checklist_core::RowStoreProvider;
use checklist_server::{ServerConfig, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Port: {}", config.port);

    let provider: Arc<dyn RowStoreProvider> = match config.backend {
        StoreBackend::Smartsheet => {
            let smartsheet = config
                .smartsheet
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Smartsheet backend selected without configuration"))?;
            tracing::info!("Smartsheet API: {}", smartsheet.base_url);
            Arc::new(SmartsheetClient::new(smartsheet)?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory sheets; data is lost on exit");
            Arc::new(InMemoryWorkspace::new())
        }
    };

    checklist_server::start_server(provider, &config).await
}
