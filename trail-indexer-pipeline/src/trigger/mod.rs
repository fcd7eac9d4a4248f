//! Trigger resolution.
//!
//! One invocation handles exactly one object. The first notification of the
//! event is used; any further notifications are logged and skipped.

use tracing::warn;

use crate::errors::PipelineError;
use trail_indexer_shared::{ObjectLocation, TriggerEvent};

/// Resolve the object an event points at.
///
/// # Returns
///
/// * `Ok(ObjectLocation)` - Bucket and decoded key of the first notification
/// * `Err(PipelineError::MalformedTriggerError)` - If the event names no object
pub fn resolve_location(event: &TriggerEvent) -> Result<ObjectLocation, PipelineError> {
    let records = event
        .records
        .as_deref()
        .ok_or_else(|| PipelineError::malformed_trigger("event has no Records array"))?;

    let first = records
        .first()
        .ok_or_else(|| PipelineError::malformed_trigger("event Records array is empty"))?;

    if records.len() > 1 {
        warn!(
            skipped = records.len() - 1,
            "Event carries more than one notification; only the first is processed"
        );
    }

    let bucket = first
        .bucket_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PipelineError::malformed_trigger("notification has no s3.bucket.name"))?;

    let raw_key = first
        .object_key()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| PipelineError::malformed_trigger("notification has no s3.object.key"))?;

    Ok(ObjectLocation::new(bucket, decode_key(raw_key)?))
}

/// Decode a notification key (`+` for space, `%XX` escapes).
fn decode_key(raw: &str) -> Result<String, PipelineError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|key| key.into_owned())
        .map_err(|e| {
            PipelineError::malformed_trigger(format!("object key is not valid UTF-8: {}", e))
        })
}
