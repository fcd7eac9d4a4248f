//! Dependency initialization and wiring for the trail indexer.

use std::sync::Arc;
use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use tracing::info;

use super::Settings;
use crate::IndexingError;
use trail_indexer_pipeline::{
    decoder::Decompressor,
    dispatcher::{Dispatcher, DispatcherConfig},
    extractor::RecordExtractor,
    fetcher::ArchiveFetcher,
    orchestrator::Orchestrator,
};
use trail_indexer_repository::{
    ArchiveStore, AwsCredentialChain, CredentialSource, DeliveryTarget, S3ArchiveStore,
    SignedDeliveryClient,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// How long to wait for in-flight deliveries before exiting.
    pub drain_timeout: Duration,
}

impl Dependencies {
    /// Initialize all dependencies from loaded settings.
    ///
    /// Object-store access and request signing both use the AWS default
    /// credential chain. The region chain falls back to the configured
    /// endpoint region when the environment names none.
    ///
    /// # Arguments
    ///
    /// * `settings` - Settings read at start-up
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            endpoint = %settings.endpoint,
            region = %settings.region,
            index = %settings.index,
            doctype = %settings.doctype,
            service = %settings.service,
            "Initializing dependencies"
        );

        let region = RegionProviderChain::default_provider()
            .or_else(Region::new(settings.region.clone()));
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let store = S3ArchiveStore::from_sdk_config(&sdk_config, settings.s3_endpoint_url.as_deref());
        info!(
            s3_endpoint_url = settings.s3_endpoint_url.as_deref().unwrap_or("default"),
            "Object store client created"
        );

        let credentials = AwsCredentialChain::from_sdk_config(&sdk_config)
            .map_err(|e| IndexingError::config(format!("Failed to resolve credential chain: {}", e)))?;

        Self::from_parts(settings, Arc::new(store), Arc::new(credentials))
    }

    /// Wire the pipeline around an explicit store and credential source.
    ///
    /// # Arguments
    ///
    /// * `settings` - Target, concurrency and drain settings
    /// * `store` - Object store the archives are read from
    /// * `credentials` - Source of signing credentials for each delivery
    pub fn from_parts(
        settings: &Settings,
        store: Arc<dyn ArchiveStore>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, IndexingError> {
        let target = DeliveryTarget::new(
            &settings.endpoint,
            &settings.region,
            &settings.index,
            &settings.doctype,
        )
        .map_err(|e| IndexingError::config(format!("Invalid indexing endpoint: {}", e)))?
        .with_service(&settings.service);

        info!(
            url = %target.document_url(),
            host = %target.host(),
            "Delivery target resolved"
        );

        let sink = SignedDeliveryClient::new(Arc::new(target), credentials);
        let dispatcher = Dispatcher::with_config(
            Arc::new(sink),
            DispatcherConfig {
                max_in_flight: settings.max_in_flight,
            },
        );

        let orchestrator = Orchestrator::new(
            ArchiveFetcher::new(store),
            Decompressor::new(),
            RecordExtractor::new(),
            dispatcher,
        );

        Ok(Self {
            orchestrator,
            drain_timeout: settings.drain_timeout,
        })
    }
}
