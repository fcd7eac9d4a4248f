//! Delivery error types.
//!
//! These errors are scoped to a single record. The pipeline logs them where
//! they occur and never turns them into an invocation failure.

use thiserror::Error;

/// Errors that can occur while delivering one record to the indexing endpoint.
#[derive(Error, Debug, Clone)]
pub enum DeliveryError {
    /// The request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Signing credentials could not be resolved.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The delivery target is incomplete or malformed.
    #[error("Invalid delivery target: {0}")]
    InvalidTarget(String),
}

impl DeliveryError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a signing error.
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a credentials error.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create an invalid target error.
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }
}
