use aws_config::SdkConfig;
use secrecy::ExposeSecret;
use voxdrop_config::AwsConfig;

/// Load the shared AWS SDK configuration
///
/// Static credentials from the config take precedence; otherwise the
/// default provider chain applies.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key) {
        let credentials = aws_credential_types::Credentials::new(
            access_key.expose_secret(),
            secret_key.expose_secret(),
            None, // session token
            None, // expiry
            "voxdrop-config",
        );
        loader = loader.credentials_provider(credentials);
    }

    let sdk_config = loader.load().await;

    tracing::debug!(region = ?sdk_config.region(), "AWS configuration loaded");

    sdk_config
}
