//! Smartsheet Store Tests
//!
//! Drives `SmartsheetStore` against a local axum server standing in for the
//! Smartsheet REST API.
//!
//! ## Test Coverage
//! - Row mapping from sheet responses and column caching
//! - Request payloads for append, update, move, reorder and delete
//! - Empty update reads the row back
//! - 404 mapped to the row or sheet the request addressed
//! - Rate limiting surfaced as a retryable error

#[cfg(test)]
mod smartsheet_store_tests {
    use anyhow::Result;
    use axum::{
        body::Bytes,
        extract::State,
        http::{HeaderMap, Method, StatusCode, Uri},
        response::{IntoResponse, Json, Response},
        Router,
    };
    use checklist_core::gateway::{RowStore, RowStoreError, RowStoreProvider, SmartsheetClient};
    use checklist_core::{ItemStatus, ItemUpdate, NewItem, SmartsheetConfig};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    const SHEET: i64 = 7;
    const MISSING_SHEET: i64 = 8;
    const THROTTLED_SHEET: i64 = 9;
    const MISSING_ROW: i64 = 99;

    #[derive(Debug, Clone)]
    struct Recorded {
        method: Method,
        path: String,
        query: Option<String>,
        body: Value,
        authorization: Option<String>,
    }

    #[derive(Clone, Default)]
    struct MockApi {
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl MockApi {
        fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        fn routes(&self) -> Vec<(Method, String)> {
            self.requests()
                .into_iter()
                .map(|request| (request.method, request.path))
                .collect()
        }

        fn last(&self) -> Recorded {
            self.requests().pop().unwrap()
        }
    }

    fn row(id: i64, parent_id: Option<i64>, name: &str, status: &str) -> Value {
        let indent = u32::from(parent_id.is_some());
        json!({
            "id": id,
            "parentId": parent_id,
            "indent": indent,
            "cells": [
                {"columnId": 101, "value": name},
                {"columnId": 102, "value": status},
                {"columnId": 103, "value": "sam"},
                {"columnId": 104}
            ]
        })
    }

    fn sheet() -> Value {
        json!({
            "id": SHEET,
            "name": "Onboarding",
            "columns": [
                {"id": 101, "title": "Task Name"},
                {"id": 102, "title": "Status"},
                {"id": 103, "title": "Assignee"},
                {"id": 104, "title": "Notes"}
            ],
            "rows": [
                row(1, None, "Kickoff", "Complete"),
                row(3, Some(1), "Sign contract", "In Progress")
            ]
        })
    }

    fn written(rows: Vec<Value>) -> Value {
        json!({"message": "SUCCESS", "resultCode": 0, "result": rows})
    }

    fn respond(method: &Method, path: &str, body: &Value) -> (StatusCode, Value) {
        let sheet_path = format!("/sheets/{}", SHEET);
        let rows_path = format!("{}/rows", sheet_path);
        let not_found = json!({"errorCode": 1006, "message": "Not Found"});

        if path.starts_with(&format!("/sheets/{}", THROTTLED_SHEET)) {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                json!({"errorCode": 4003, "message": "Rate limit exceeded."}),
            );
        }

        match *method {
            Method::GET if path == sheet_path => (StatusCode::OK, sheet()),
            Method::GET if path == format!("{}/3", rows_path) => {
                (StatusCode::OK, row(3, Some(1), "Sign contract", "In Progress"))
            }
            Method::POST if path == rows_path => {
                let parent_id = body[0]["parentId"].as_i64();
                let name = body[0]["cells"][0]["value"].as_str().unwrap_or_default();
                (StatusCode::OK, written(vec![row(10, parent_id, name, "Not Started")]))
            }
            Method::PUT if path == rows_path => {
                let id = body[0]["id"].as_i64().unwrap_or_default();
                if id == MISSING_ROW {
                    return (StatusCode::NOT_FOUND, not_found);
                }
                let parent_id = body[0]["parentId"].as_i64();
                (StatusCode::OK, written(vec![row(id, parent_id, "Sign contract", "Complete")]))
            }
            Method::DELETE if path == rows_path => (StatusCode::OK, written(vec![json!(3)])),
            Method::POST if path == "/sheets" => {
                let name = body["name"].clone();
                (StatusCode::OK, json!({"message": "SUCCESS", "result": {"id": 55, "name": name}}))
            }
            _ => (StatusCode::NOT_FOUND, not_found),
        }
    }

    async fn handle(
        State(api): State<MockApi>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let (status, payload) = respond(&method, uri.path(), &body);

        api.requests.lock().unwrap().push(Recorded {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body,
            authorization: headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        });

        (status, Json(payload)).into_response()
    }

    /// Helper to start the stand-in API and a client pointed at it
    async fn create_test_env() -> Result<(SmartsheetClient, MockApi)> {
        let api = MockApi::default();
        let app = Router::new().fallback(handle).with_state(api.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, app).await });

        let mut config = SmartsheetConfig::new("test-token");
        config.base_url = format!("http://{}", addr);
        Ok((SmartsheetClient::new(&config)?, api))
    }

    #[tokio::test]
    async fn test_get_rows_maps_cells_and_caches_columns() -> Result<()> {
        let (client, api) = create_test_env().await?;
        let store = client.store(SHEET);

        let rows = store.get_rows().await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Kickoff");
        assert_eq!(rows[0].status, ItemStatus::Complete);
        assert_eq!(rows[1].parent_id, Some(1));
        assert_eq!(rows[1].status, ItemStatus::InProgress);
        assert_eq!(rows[1].assignee, "sam");
        assert_eq!(rows[1].notes, "");
        assert_eq!(rows[1].indent, 1);

        // Column ids come from the snapshot already fetched
        store.move_row(3, Some(1)).await?;
        assert_eq!(
            api.routes(),
            vec![
                (Method::GET, "/sheets/7".to_string()),
                (Method::PUT, "/sheets/7/rows".to_string()),
            ]
        );
        assert_eq!(api.last().authorization.as_deref(), Some("Bearer test-token"));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_payloads() -> Result<()> {
        let (client, api) = create_test_env().await?;
        let store = client.store(SHEET);

        let moved = store.move_row(3, Some(1)).await?;
        assert_eq!(moved.parent_id, Some(1));
        assert_eq!(api.last().body, json!([{"id": 3, "parentId": 1}]));

        store.move_row(3, None).await?;
        assert_eq!(api.last().body, json!([{"id": 3, "toTop": true}]));

        store.reorder_row(3, 1, true).await?;
        assert_eq!(api.last().body, json!([{"id": 3, "siblingId": 1, "above": true}]));

        let updated = store
            .update_row(
                3,
                ItemUpdate {
                    status: Some(ItemStatus::Complete),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(updated.status, ItemStatus::Complete);
        assert_eq!(
            api.last().body,
            json!([{"id": 3, "cells": [{"columnId": 102, "value": "Complete"}]}])
        );

        let added = store.add_row(NewItem::new("Order laptop").with_parent(1)).await?;
        assert_eq!(added.id, 10);
        assert_eq!(added.name, "Order laptop");
        let append = api.last();
        assert_eq!(append.method, Method::POST);
        assert_eq!(append.body[0]["parentId"], 1);
        assert_eq!(append.body[0]["toBottom"], true);

        // Only the first call resolved the columns
        let sheet_reads = api
            .routes()
            .into_iter()
            .filter(|(method, path)| *method == Method::GET && path == "/sheets/7")
            .count();
        assert_eq!(sheet_reads, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_update_reads_row_back() -> Result<()> {
        let (client, api) = create_test_env().await?;
        let store = client.store(SHEET);

        let row = store.update_row(3, ItemUpdate::default()).await?;
        assert_eq!(row.name, "Sign contract");
        assert_eq!(row.status, ItemStatus::InProgress);
        assert_eq!(
            api.routes(),
            vec![
                (Method::GET, "/sheets/7".to_string()),
                (Method::GET, "/sheets/7/rows/3".to_string()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_row_passes_id_as_query() -> Result<()> {
        let (client, api) = create_test_env().await?;

        client.store(SHEET).delete_row(3).await?;
        let request = api.last();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "/sheets/7/rows");
        assert_eq!(request.query.as_deref(), Some("ids=3"));
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_names_the_addressed_resource() -> Result<()> {
        let (client, _api) = create_test_env().await?;

        let missing_row = client.store(SHEET).move_row(MISSING_ROW, Some(1)).await;
        assert_eq!(missing_row.unwrap_err(), RowStoreError::row_not_found(MISSING_ROW));

        let missing_sheet = client.store(MISSING_SHEET).get_rows().await;
        assert_eq!(missing_sheet.unwrap_err(), RowStoreError::sheet_not_found(MISSING_SHEET));
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limit_is_retryable() -> Result<()> {
        let (client, _api) = create_test_env().await?;

        let err = client.store(THROTTLED_SHEET).get_rows().await.unwrap_err();
        assert_eq!(err, RowStoreError::RateLimited);
        assert!(err.is_retryable());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_sheet_posts_checklist_columns() -> Result<()> {
        let (client, api) = create_test_env().await?;

        let id = client.create_sheet("Acme onboarding").await?;
        assert_eq!(id, 55);

        let request = api.last();
        assert_eq!((request.method, request.path.as_str()), (Method::POST, "/sheets"));
        assert_eq!(request.body["name"], "Acme onboarding");
        assert_eq!(request.body["columns"].as_array().map(Vec::len), Some(4));
        Ok(())
    }
}
