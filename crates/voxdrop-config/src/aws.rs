use secrecy::SecretString;
use serde::Deserialize;

/// AWS settings shared by the Polly and S3 clients
///
/// Anything left unset falls back to the SDK default provider chain
/// (environment, shared profile, instance metadata).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsConfig {
    /// Region override (e.g. "us-east-1")
    #[serde(default)]
    pub region: Option<String>,
    /// Static access key ID
    #[serde(default)]
    pub access_key_id: Option<SecretString>,
    /// Static secret access key
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}
