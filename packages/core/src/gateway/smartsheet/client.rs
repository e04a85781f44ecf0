//! Smartsheet HTTP client

use super::store::SmartsheetStore;
use super::wire::{error_from_response, CreateSheet, CreatedSheet, ResultEnvelope, SheetResponse};
use crate::config::SmartsheetConfig;
use crate::gateway::{RowStore, RowStoreError, RowStoreProvider, SheetId};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Connection to the Smartsheet REST API
///
/// Cheap to clone: clones share one connection pool. Build one per process
/// (or per credential) and open sheet-scoped stores from it.
#[derive(Clone)]
pub struct SmartsheetClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl SmartsheetClient {
    pub fn new(config: &SmartsheetConfig) -> Result<Self, RowStoreError> {
        config
            .validate()
            .map_err(|e| RowStoreError::ConfigError(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RowStoreError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Row store bound to one sheet
    pub fn store(&self, sheet_id: SheetId) -> SmartsheetStore {
        SmartsheetStore::new(self.clone(), sheet_id)
    }

    pub(crate) async fn get_sheet(&self, sheet_id: SheetId) -> Result<SheetResponse, RowStoreError> {
        self.send(
            Method::GET,
            &format!("sheets/{}", sheet_id),
            None::<&()>,
            RowStoreError::sheet_not_found(sheet_id),
        )
        .await
    }

    /// Send a request and decode the JSON response
    ///
    /// `not_found` is returned for a 404.
    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        not_found: RowStoreError,
    ) -> Result<T, RowStoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%method, %url, "Smartsheet request");

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| RowStoreError::malformed(format!("Failed to parse response: {}", e)))
        } else {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error = error_from_response(status.as_u16(), &text, not_found);
            tracing::debug!(status = status.as_u16(), error = %error, "Smartsheet request failed");
            Err(error)
        }
    }
}

fn transport_error(error: reqwest::Error) -> RowStoreError {
    if error.is_timeout() {
        RowStoreError::Timeout
    } else {
        RowStoreError::Transport(error.to_string())
    }
}

#[async_trait]
impl RowStoreProvider for SmartsheetClient {
    fn open_sheet(&self, sheet_id: SheetId) -> Result<Arc<dyn RowStore>, RowStoreError> {
        Ok(Arc::new(self.store(sheet_id)))
    }

    #[instrument(skip(self))]
    async fn create_sheet(&self, name: &str) -> Result<SheetId, RowStoreError> {
        let created: ResultEnvelope<CreatedSheet> = self
            .send(
                Method::POST,
                "sheets",
                Some(&CreateSheet::checklist(name)),
                RowStoreError::rejected("Sheet creation endpoint not found"),
            )
            .await?;

        tracing::info!(sheet_id = created.result.id, name, "Created Smartsheet sheet");
        Ok(created.result.id)
    }
}

impl std::fmt::Debug for SmartsheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartsheetClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
