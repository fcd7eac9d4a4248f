//! Error types for the trail indexer pipeline.

use thiserror::Error;
use trail_indexer_repository::FetchError;

/// Errors that end an invocation.
///
/// Each variant corresponds to the stage that produced it. Per-record
/// delivery failures are deliberately absent: they are logged by the
/// dispatcher and never fail an invocation.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// The trigger event does not name an object.
    #[error("Malformed trigger: {0}")]
    MalformedTriggerError(String),

    /// The archive could not be read from the object store.
    #[error("Fetch error: {0}")]
    NotFoundOrAccessError(#[from] FetchError),

    /// The archive is not a valid compressed stream.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The decoded text is not a valid record container.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl PipelineError {
    /// Create a malformed trigger error.
    pub fn malformed_trigger(msg: impl Into<String>) -> Self {
        Self::MalformedTriggerError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
