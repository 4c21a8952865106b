use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client as S3Client,
    config::{Credentials, Region},
};

use super::StorageConfig;

/// Builds a path-style S3 client for the managed backend's storage endpoint.
pub fn load_s3_client(config: &StorageConfig) -> S3Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
        None,
        None,
        "env-credentials",
    );

    let s3_config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(config.endpoint.clone())
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();

    tracing::info!("Storage client initialized for bucket {}", config.bucket);

    S3Client::from_conf(s3_config)
}
