//! Record extractor.
//!
//! Parses decoded archive text and yields its records in document order.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::PipelineError;
use trail_indexer_shared::EventRecord;

/// Top-level archive document. Fields other than `Records` are ignored.
#[derive(Debug, Deserialize)]
struct ArchiveDocument {
    #[serde(rename = "Records")]
    records: Vec<EventRecord>,
}

/// Stateless parser for archive documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordExtractor;

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the ordered records of one archive.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<EventRecord>)` - Zero or more records, in archive order
    /// * `Err(PipelineError::ParseError)` - If the text is not valid JSON or has no `Records` array
    #[instrument(skip(self, text), fields(text_size = text.len()))]
    pub fn extract(&self, text: &str) -> Result<Vec<EventRecord>, PipelineError> {
        let document: ArchiveDocument = serde_json::from_str(text).map_err(|e| {
            PipelineError::parse(format!("Unable to parse CloudTrail JSON: {}", e))
        })?;

        debug!(record_count = document.records.len(), "Extracted records");
        Ok(document.records)
    }
}
