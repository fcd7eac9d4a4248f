//! Signing credentials and their sources.

use async_trait::async_trait;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use std::fmt;

use crate::errors::DeliveryError;
use crate::interfaces::CredentialSource;

/// An access key pair, optionally with a session token.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl SigningCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials).
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

/// Fixed credentials supplied by the caller.
#[async_trait]
impl CredentialSource for SigningCredentials {
    async fn credentials(&self) -> Result<SigningCredentials, DeliveryError> {
        Ok(self.clone())
    }
}

/// Credentials from the AWS default provider chain
/// (environment, shared profile, container or instance role).
#[derive(Debug, Clone)]
pub struct AwsCredentialChain {
    provider: SharedCredentialsProvider,
}

impl AwsCredentialChain {
    pub fn new(provider: SharedCredentialsProvider) -> Self {
        Self { provider }
    }

    /// Take the credentials provider out of a loaded SDK configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(AwsCredentialChain)` - When the configuration carries a provider
    /// * `Err(DeliveryError::Credentials)` - When no provider was configured
    pub fn from_sdk_config(config: &aws_config::SdkConfig) -> Result<Self, DeliveryError> {
        config
            .credentials_provider()
            .map(Self::new)
            .ok_or_else(|| DeliveryError::credentials("no credentials provider configured"))
    }
}

#[async_trait]
impl CredentialSource for AwsCredentialChain {
    async fn credentials(&self) -> Result<SigningCredentials, DeliveryError> {
        let credentials = self
            .provider
            .provide_credentials()
            .await
            .map_err(|e| DeliveryError::credentials(e.to_string()))?;

        let mut resolved =
            SigningCredentials::new(credentials.access_key_id(), credentials.secret_access_key());
        if let Some(token) = credentials.session_token() {
            resolved = resolved.with_session_token(token);
        }
        Ok(resolved)
    }
}
