//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use voxdrop_config::{Config, HealthConfig, ServerConfig, StorageConfig};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                },
                storage: StorageConfig {
                    bucket: "test-audio".to_owned(),
                    ..StorageConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Set the lifetime of presigned URLs
    pub fn with_expire_seconds(mut self, seconds: u64) -> Self {
        self.config.storage.expire_seconds = seconds;
        self
    }

    /// Set the object key prefix
    pub fn with_key_prefix(mut self, prefix: &str) -> Self {
        self.config.storage.key_prefix = prefix.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
