//! Credential source trait definition.

use async_trait::async_trait;

use crate::errors::DeliveryError;
use crate::signing::SigningCredentials;

/// Supplies the credentials requests are signed with.
///
/// Called once per request so that short-lived credentials can rotate
/// underneath a long-running process.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Resolve the current credentials.
    ///
    /// # Returns
    ///
    /// * `Ok(SigningCredentials)` - Credentials valid for signing now
    /// * `Err(DeliveryError::Credentials)` - If no credentials are available
    async fn credentials(&self) -> Result<SigningCredentials, DeliveryError>;
}
