//! # Trail Indexer Shared
//!
//! Data types shared by the audit trail indexer crates: the object-store
//! notification that triggers an invocation, the location it points at, and
//! the opaque event records extracted from an archive.

mod record;
mod trigger;

pub use record::EventRecord;
pub use trigger::{
    NotificationBucket, NotificationObject, NotificationRecord, NotificationS3, ObjectLocation,
    TriggerEvent,
};
