use std::time::Duration;

use serde::Deserialize;

/// Default lifetime of presigned download URLs, in seconds
pub const DEFAULT_EXPIRE_SECONDS: u64 = 3600;

/// Longest expiry S3 accepts for a SigV4 presigned URL (7 days)
pub const MAX_EXPIRE_SECONDS: u64 = 604_800;

/// Default namespace for generated object keys
pub const DEFAULT_KEY_PREFIX: &str = "tts-output";

/// Object storage configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Destination bucket for synthesized audio
    #[serde(default)]
    pub bucket: String,
    /// Presigned URL lifetime in seconds
    #[serde(default = "default_expire_seconds")]
    pub expire_seconds: u64,
    /// Prefix for object keys, without surrounding slashes
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Endpoint override for S3-compatible stores (`MinIO`, R2)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Address buckets by path instead of virtual host
    #[serde(default)]
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            expire_seconds: DEFAULT_EXPIRE_SECONDS,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            endpoint_url: None,
            force_path_style: false,
        }
    }
}

impl StorageConfig {
    /// Presigned URL lifetime as a `Duration`
    pub const fn url_ttl(&self) -> Duration {
        Duration::from_secs(self.expire_seconds)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_expire_seconds() -> u64 {
    DEFAULT_EXPIRE_SECONDS
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}
