use std::path::Path;

use secrecy::ExposeSecret;

use crate::{
    Config, StorageConfig,
    env::{BUCKET_VAR, EXPIRE_SECONDS_VAR, non_empty_var},
    storage::{DEFAULT_EXPIRE_SECONDS, MAX_EXPIRE_SECONDS},
};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build configuration from environment variables only
    ///
    /// `S3_BUCKET` is required. `AUDIO_EXPIRE_SECONDS` defaults to 3600.
    /// Everything else takes its default; AWS region and credentials come
    /// from the SDK's own environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `S3_BUCKET` is unset, `AUDIO_EXPIRE_SECONDS` is
    /// not an integer, or validation fails
    pub fn from_env() -> anyhow::Result<Self> {
        let bucket =
            non_empty_var(BUCKET_VAR).ok_or_else(|| anyhow::anyhow!("environment variable `{BUCKET_VAR}` must be set"))?;

        let expire_seconds = match non_empty_var(EXPIRE_SECONDS_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("invalid `{EXPIRE_SECONDS_VAR}` value `{raw}`: {e}"))?,
            None => DEFAULT_EXPIRE_SECONDS,
        };

        let config = Self {
            storage: StorageConfig {
                bucket,
                expire_seconds,
                ..StorageConfig::default()
            },
            ..Self::default()
        };

        config.validate()?;

        tracing::debug!(
            bucket = %config.storage.bucket,
            expire_seconds = config.storage.expire_seconds,
            "configuration resolved from environment"
        );

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a relative health path, a missing
    /// bucket, an out-of-range URL lifetime, a malformed key prefix,
    /// half-configured static credentials, or a sampling rate outside
    /// `0.0..=1.0`
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server_config()?;
        self.validate_storage_config()?;
        self.validate_aws_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_server_config(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/', got {:?}", health.path);
        }

        Ok(())
    }

    fn validate_storage_config(&self) -> anyhow::Result<()> {
        let storage = &self.storage;

        if storage.bucket.trim().is_empty() {
            anyhow::bail!("storage.bucket must not be empty");
        }

        if storage.expire_seconds == 0 || storage.expire_seconds > MAX_EXPIRE_SECONDS {
            anyhow::bail!(
                "storage.expire_seconds must be between 1 and {MAX_EXPIRE_SECONDS}, got {}",
                storage.expire_seconds
            );
        }

        if storage.key_prefix.is_empty() || storage.key_prefix.starts_with('/') || storage.key_prefix.ends_with('/') {
            anyhow::bail!("storage.key_prefix must be non-empty and must not start or end with '/'");
        }

        Ok(())
    }

    fn validate_aws_config(&self) -> anyhow::Result<()> {
        let aws = &self.aws;

        match (&aws.access_key_id, &aws.secret_access_key) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("aws.access_key_id and aws.secret_access_key must be set together");
            }
            (Some(key), Some(_)) if key.expose_secret().is_empty() => {
                anyhow::bail!("aws.access_key_id must not be empty");
            }
            _ => {}
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(tracing) = self.telemetry.as_ref().and_then(|t| t.tracing.as_ref()) else {
            return Ok(());
        };

        if !(0.0..=1.0).contains(&tracing.sampling_rate) {
            anyhow::bail!(
                "telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {}",
                tracing.sampling_rate
            );
        }

        Ok(())
    }
}
