use crate::domain::model::DataTable;
use crate::domain::ports::Warehouse;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Streaming-insert style warehouse client: one
/// `POST {endpoint}/tables/{table}/rows` per run, rows as JSON.
pub struct HttpWarehouse {
    client: Client,
    endpoint: String,
    table: String,
    token: Option<String>,
}

impl HttpWarehouse {
    pub fn new(endpoint: String, table: String, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            table,
            token,
        }
    }

    fn insert_url(&self) -> String {
        format!(
            "{}/tables/{}/rows",
            self.endpoint.trim_end_matches('/'),
            self.table
        )
    }
}

#[async_trait::async_trait]
impl Warehouse for HttpWarehouse {
    async fn append_rows(&self, table: &DataTable) -> Result<()> {
        let url = self.insert_url();
        let body = serde_json::json!({ "rows": table.rows });

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| EtlError::LoadError {
            message: format!("warehouse request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::LoadError {
                message: format!("warehouse insert to {} returned {}", self.table, status),
            });
        }

        tracing::debug!("Warehouse accepted {} rows", table.row_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use chrono::Utc;
    use httpmock::prelude::*;
    use std::collections::HashMap;

    fn one_row_table() -> DataTable {
        let mut data = HashMap::new();
        data.insert("system_id".to_string(), serde_json::Value::Number(1.into()));
        data.insert(
            "system_name".to_string(),
            serde_json::Value::String("Line A".to_string()),
        );
        DataTable {
            rows: vec![Record { data }],
            ingestion_time: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_rows_posts_json_rows() {
        let server = MockServer::start();
        let insert_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/tables/operators/rows")
                .json_body_partial(r#"{"rows": [{"system_id": 1, "system_name": "Line A"}]}"#);
            then.status(200);
        });

        let warehouse =
            HttpWarehouse::new(server.base_url(), "operators".to_string(), None);
        warehouse.append_rows(&one_row_table()).await.unwrap();

        insert_mock.assert();
    }

    #[tokio::test]
    async fn test_append_rows_sends_bearer_token() {
        let server = MockServer::start();
        let insert_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/tables/operators/rows")
                .header("Authorization", "Bearer wh-token");
            then.status(200);
        });

        let warehouse = HttpWarehouse::new(
            server.base_url(),
            "operators".to_string(),
            Some("wh-token".to_string()),
        );
        warehouse.append_rows(&one_row_table()).await.unwrap();

        insert_mock.assert();
    }

    #[tokio::test]
    async fn test_append_rows_non_success_is_load_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/tables/operators/rows");
            then.status(403);
        });

        let warehouse =
            HttpWarehouse::new(server.base_url(), "operators".to_string(), None);
        let result = warehouse.append_rows(&one_row_table()).await;

        assert!(matches!(result, Err(EtlError::LoadError { .. })));
    }

    #[test]
    fn test_insert_url_trims_trailing_slash() {
        let warehouse = HttpWarehouse::new(
            "https://wh.example.com/".to_string(),
            "operators".to_string(),
            None,
        );
        assert_eq!(
            warehouse.insert_url(),
            "https://wh.example.com/tables/operators/rows"
        );
    }
}
