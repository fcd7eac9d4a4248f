//! S3 archive store implementation.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as AwsS3Client;
use tracing::{debug, info, instrument};

use crate::errors::FetchError;
use crate::interfaces::ArchiveStore;
use trail_indexer_shared::ObjectLocation;

/// Reads archives with `GetObject`.
#[derive(Clone)]
pub struct S3ArchiveStore {
    client: AwsS3Client,
}

impl S3ArchiveStore {
    /// Wrap an existing SDK client.
    pub fn new(client: AwsS3Client) -> Self {
        Self { client }
    }

    /// Build a store from a loaded SDK configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Shared AWS configuration (region, credentials)
    /// * `endpoint_url` - Optional S3-compatible endpoint; enables path-style addressing
    pub fn from_sdk_config(config: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(config);

        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(endpoint = ?endpoint_url, "Created S3 archive store");

        Self::new(AwsS3Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ArchiveStore for S3ArchiveStore {
    #[instrument(skip(self), fields(bucket = %location.bucket, key = %location.key))]
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                FetchError::not_found_or_access(
                    &location.bucket,
                    &location.key,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        let body = response.body.collect().await.map_err(|e| {
            FetchError::not_found_or_access(
                &location.bucket,
                &location.key,
                format!("failed to read object body: {}", e),
            )
        })?;

        let bytes = body.into_bytes().to_vec();
        debug!(size = bytes.len(), "Read object body");
        Ok(bytes)
    }
}
