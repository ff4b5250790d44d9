use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use aws_sdk_s3::Client as S3Client;

/// One `put_object` per archived payload. Bucket pre-exists; keys are never
/// overwritten in practice because they are timestamped per run.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!("put_object s3://{}/{} failed: {}", self.bucket, path, e),
            })?;

        Ok(())
    }
}
