//! Amazon S3 (and S3-compatible) object store

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::error::display::DisplayErrorContext;
use voxdrop_config::StorageConfig;

use super::ObjectStore;
use crate::error::TtsError;

/// Object store writing to a single S3 bucket
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, config: &StorageConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config).force_path_style(config.force_path_style);

        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> crate::error::Result<()> {
        tracing::debug!(bucket = %self.bucket, key, content_type, size = body.len(), "S3 put_object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key, error = ?e, "S3 put_object failed");
                TtsError::Storage(DisplayErrorContext(&e).to_string())
            })?;

        Ok(())
    }

    async fn sign_url(&self, key: &str, ttl: Duration) -> crate::error::Result<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            tracing::error!(?ttl, error = ?e, "invalid presigning configuration");
            TtsError::Signing(DisplayErrorContext(&e).to_string())
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key, error = ?e, "S3 presign failed");
                TtsError::Signing(DisplayErrorContext(&e).to_string())
            })?;

        Ok(request.uri().to_string())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
