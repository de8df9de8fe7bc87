pub mod s3;

use std::time::Duration;

use async_trait::async_trait;

/// Trait for object stores holding synthesized audio
///
/// The bucket (or container) is fixed when the store is constructed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` with the given content type
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> crate::error::Result<()>;

    /// Produce a presigned download URL for `key`, valid for `ttl`
    async fn sign_url(&self, key: &str, ttl: Duration) -> crate::error::Result<String>;

    /// Get the bucket objects are written to
    fn bucket(&self) -> &str;
}
