//! Loading the trigger event handed to one invocation.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::IndexingError;
use trail_indexer_shared::TriggerEvent;

/// Source name that reads the event from standard input.
pub const STDIN_SOURCE: &str = "-";

/// Read and parse a trigger event from a file, or from stdin when `source` is `-`.
pub async fn load_event(source: &str) -> Result<TriggerEvent, IndexingError> {
    let text = if source == STDIN_SOURCE {
        read_document(tokio::io::stdin(), "stdin").await?
    } else {
        tokio::fs::read_to_string(Path::new(source))
            .await
            .map_err(|e| IndexingError::event(format!("Unable to read {}: {}", source, e)))?
    };

    debug!(source = %source, bytes = text.len(), "Trigger event read");
    parse_event(&text)
}

/// Parse a trigger event document.
pub fn parse_event(text: &str) -> Result<TriggerEvent, IndexingError> {
    TriggerEvent::from_json(text)
        .map_err(|e| IndexingError::event(format!("Invalid trigger event: {}", e)))
}

async fn read_document<R>(mut reader: R, name: &str) -> Result<String, IndexingError>
where
    R: AsyncRead + Unpin,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .await
        .map_err(|e| IndexingError::event(format!("Unable to read {}: {}", name, e)))?;
    Ok(text)
}
