//! Fetcher module for the trail indexer pipeline.
//!
//! Reads the compressed archive named by the trigger from the object store.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::PipelineError;
use trail_indexer_repository::ArchiveStore;
use trail_indexer_shared::ObjectLocation;

/// Fetches raw archive bytes. No retries at this layer.
pub struct ArchiveFetcher {
    store: Arc<dyn ArchiveStore>,
}

impl ArchiveFetcher {
    pub fn new(store: Arc<dyn ArchiveStore>) -> Self {
        Self { store }
    }

    /// Download one archive.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The raw compressed bytes
    /// * `Err(PipelineError::NotFoundOrAccessError)` - If the store rejected the read
    #[instrument(skip(self), fields(location = %location))]
    pub async fn fetch(&self, location: &ObjectLocation) -> Result<Vec<u8>, PipelineError> {
        info!(bucket = %location.bucket, key = %location.key, "Downloading archive");

        let bytes = self.store.get_object(location).await?;

        info!(size = bytes.len(), "Archive downloaded");
        Ok(bytes)
    }
}
