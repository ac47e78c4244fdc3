use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use shared::Config;
use tracing::debug;

use crate::error::StoreError;

/// How long an issued upload URL stays writable.
const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(1000);

#[async_trait]
pub trait UploadUrlSigner: Send + Sync {
    /// A time-limited URL granting PUT access to `key` in the attachment
    /// bucket. Producing it is a local signing computation, not a store
    /// round trip.
    async fn upload_url(&self, key: &str) -> Result<String, StoreError>;
}

#[derive(Clone)]
pub struct S3UploadSigner {
    client: Client,
    bucket_name: String,
}

impl S3UploadSigner {
    pub fn new(aws_config: &aws_config::SdkConfig, config: &Config) -> Self {
        Self {
            client: Client::new(aws_config),
            bucket_name: config.bucket_name.clone(),
        }
    }
}

#[async_trait]
impl UploadUrlSigner for S3UploadSigner {
    async fn upload_url(&self, key: &str) -> Result<String, StoreError> {
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_EXPIRY)
            .map_err(|e| StoreError::Presign(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StoreError::Presign(e.to_string()))?;

        debug!(key = %key, "Issued upload URL");
        Ok(request.uri().to_string())
    }
}
