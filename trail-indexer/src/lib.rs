//! # Trail Indexer
//!
//! Main library for the audit trail indexer.
//!
//! This crate provides configuration loading, dependency wiring and logging
//! set-up for running the ingestion pipeline from the command line.

pub mod config;
pub mod event;
pub mod telemetry;

pub use config::{Dependencies, Settings};
pub use event::{load_event, parse_event};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The trigger event document could not be read or parsed.
    #[error("Event error: {0}")]
    EventError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] trail_indexer_pipeline::PipelineError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an event error.
    pub fn event(msg: impl Into<String>) -> Self {
        Self::EventError(msg.into())
    }
}
