use crate::core::{fetch, transform};
use crate::domain::model::DataTable;
use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Warehouse};
use crate::utils::error::Result;
use chrono::Utc;
use reqwest::Client;

/// Concrete four-step pipeline for the municipal operators feed.
pub struct MuniPipeline<S: Storage, W: Warehouse, C: ConfigProvider> {
    storage: S,
    warehouse: W,
    config: C,
    client: Client,
}

impl<S: Storage, W: Warehouse, C: ConfigProvider> MuniPipeline<S, W, C> {
    pub fn new(storage: S, warehouse: W, config: C) -> Self {
        Self {
            storage,
            warehouse,
            config,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, W: Warehouse, C: ConfigProvider> Pipeline for MuniPipeline<S, W, C> {
    async fn fetch(&self) -> Result<serde_json::Value> {
        // The key is appended to the URL, so only the base endpoint is logged.
        tracing::debug!("Making API request to: {}", self.config.api_url());
        let url = format!("{}{}", self.config.api_url(), self.config.api_key());

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let bytes = response.error_for_status()?.bytes().await?;
        fetch::decode_payload(&bytes)
    }

    async fn archive(&self, payload: &serde_json::Value) -> Result<String> {
        let key = format!(
            "{}/operators_{}.json",
            self.config.archive_prefix(),
            Utc::now().format("%Y%m%dT%H%M%SZ")
        );
        let body = serde_json::to_vec(payload)?;

        tracing::debug!("Writing raw payload ({} bytes) to {}", body.len(), key);
        self.storage.write_file(&key, &body).await?;
        Ok(key)
    }

    async fn transform(&self, payload: serde_json::Value) -> Result<DataTable> {
        transform::build_table(&payload, Utc::now())
    }

    async fn load(&self, table: DataTable) -> Result<()> {
        tracing::debug!("Appending {} rows to warehouse", table.row_count());
        self.warehouse.append_rows(&table).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn files(&self) -> HashMap<String, Vec<u8>> {
            self.files.lock().await.clone()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Clone)]
    struct MockWarehouse {
        appended: Arc<Mutex<Vec<DataTable>>>,
    }

    impl MockWarehouse {
        fn new() -> Self {
            Self {
                appended: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait::async_trait]
    impl Warehouse for MockWarehouse {
        async fn append_rows(&self, table: &DataTable) -> Result<()> {
            self.appended.lock().await.push(table.clone());
            Ok(())
        }
    }

    struct MockConfig {
        api_url: String,
        api_key: String,
    }

    impl ConfigProvider for MockConfig {
        fn api_url(&self) -> &str {
            &self.api_url
        }

        fn api_key(&self) -> &str {
            &self.api_key
        }

        fn archive_prefix(&self) -> &str {
            "raw"
        }
    }

    fn pipeline_for(
        server: &MockServer,
    ) -> MuniPipeline<MockStorage, MockWarehouse, MockConfig> {
        let config = MockConfig {
            api_url: server.url("/operators?key="),
            api_key: "secret123".to_string(),
        };
        MuniPipeline::new(MockStorage::new(), MockWarehouse::new(), config)
    }

    #[tokio::test]
    async fn test_fetch_appends_key_and_parses_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/operators")
                .query_param("key", "secret123");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([{"Id": 1}]));
        });

        let pipeline = pipeline_for(&server);
        let payload = pipeline.fetch().await.unwrap();

        api_mock.assert();
        assert_eq!(payload, serde_json::json!([{"Id": 1}]));
    }

    #[tokio::test]
    async fn test_fetch_strips_bom() {
        let server = MockServer::start();
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(br#"[{"Id": 7}]"#);

        server.mock(|when, then| {
            when.method(GET).path("/operators");
            then.status(200).body(body);
        });

        let pipeline = pipeline_for(&server);
        let payload = pipeline.fetch().await.unwrap();
        assert_eq!(payload, serde_json::json!([{"Id": 7}]));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_transport_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/operators");
            then.status(503);
        });

        let pipeline = pipeline_for(&server);
        let result = pipeline.fetch().await;

        api_mock.assert();
        assert!(matches!(result, Err(EtlError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_archive_writes_one_object_under_prefix() {
        let server = MockServer::start();
        let storage = MockStorage::new();
        let config = MockConfig {
            api_url: server.url("/operators?key="),
            api_key: "secret123".to_string(),
        };
        let pipeline = MuniPipeline::new(storage.clone(), MockWarehouse::new(), config);

        let payload = serde_json::json!([{"Id": 1}]);
        let key = pipeline.archive(&payload).await.unwrap();

        assert!(key.starts_with("raw/operators_"));
        assert!(key.ends_with(".json"));

        let files = storage.files().await;
        assert_eq!(files.len(), 1);
        let stored: serde_json::Value = serde_json::from_slice(&files[&key]).unwrap();
        assert_eq!(stored, payload);
    }

    #[tokio::test]
    async fn test_load_hands_table_to_warehouse() {
        let server = MockServer::start();
        let warehouse = MockWarehouse::new();
        let config = MockConfig {
            api_url: server.url("/operators?key="),
            api_key: "secret123".to_string(),
        };
        let pipeline = MuniPipeline::new(MockStorage::new(), warehouse.clone(), config);

        let payload = serde_json::json!([
            {"Id": 1, "Name": "Line A", "LastGenerated": "2024-01-01T00:00:00Z"}
        ]);
        let table = pipeline.transform(payload).await.unwrap();
        pipeline.load(table).await.unwrap();

        let appended = warehouse.appended.lock().await;
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].row_count(), 1);
    }
}
