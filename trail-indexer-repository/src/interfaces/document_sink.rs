//! Document sink trait definition.

use async_trait::async_trait;

use crate::errors::DeliveryError;
use crate::types::DeliveryReport;

/// Accepts one serialized record for indexing.
///
/// # Error Handling
///
/// A returned error means the record could not be handed to the backend
/// (signing, credentials, connection). A backend that answers with a
/// non-success status still yields `Ok`; inspect `DeliveryReport::status`.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Deliver one document.
    ///
    /// # Arguments
    ///
    /// * `document` - The record's serialized JSON text, sent verbatim as the body
    async fn deliver(&self, document: String) -> Result<DeliveryReport, DeliveryError>;
}
