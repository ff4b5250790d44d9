use crate::domain::model::DataTable;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn append_rows(&self, table: &DataTable) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn archive_prefix(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<serde_json::Value>;
    async fn archive(&self, payload: &serde_json::Value) -> Result<String>;
    async fn transform(&self, payload: serde_json::Value) -> Result<DataTable>;
    async fn load(&self, table: DataTable) -> Result<()>;
}
