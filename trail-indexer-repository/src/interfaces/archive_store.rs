//! Archive store trait definition.

use async_trait::async_trait;

use crate::errors::FetchError;
use trail_indexer_shared::ObjectLocation;

/// Read access to the object store holding compressed archives.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Read the full content of one object.
    ///
    /// # Arguments
    ///
    /// * `location` - Bucket and (decoded) key of the object
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The raw object bytes
    /// * `Err(FetchError::NotFoundOrAccess)` - If the store rejects the read for any reason
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, FetchError>;
}
