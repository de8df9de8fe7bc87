#![allow(clippy::must_use_candidate)]

pub mod aws;
mod env;
mod loader;
pub mod server;
pub mod storage;
pub mod synthesis;
pub mod telemetry;

use serde::Deserialize;

pub use aws::*;
pub use server::*;
pub use storage::*;
pub use synthesis::*;
pub use telemetry::{ExportProtocol, ExporterConfig, LogFormat, MetricsConfig, TelemetryConfig, TracingConfig};

/// Top-level voxdrop configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared AWS region and credentials
    #[serde(default)]
    pub aws: AwsConfig,
    /// Speech synthesis (Polly) configuration
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// Object storage (S3) configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
