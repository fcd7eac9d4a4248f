//! # Trail Indexer Pipeline
//!
//! This crate provides the ingestion pipeline that turns one object-store
//! notification into indexed audit records.
//!
//! ## Architecture
//!
//! The pipeline runs four stages in order:
//!
//! 1. **Fetcher**: Reads the compressed archive from the object store
//! 2. **Decompressor**: Decodes the gzip stream into text
//! 3. **Extractor**: Parses the text and yields the ordered records
//! 4. **Dispatcher**: Sends each record to the indexing endpoint as its own task
//!
//! The **Orchestrator** drives the stages and reports one outcome per invocation.

pub mod decoder;
pub mod dispatcher;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod orchestrator;
pub mod trigger;

pub use errors::PipelineError;
pub use orchestrator::{Invocation, Orchestrator, Outcome, PipelineStage, SUCCESS_MESSAGE};
