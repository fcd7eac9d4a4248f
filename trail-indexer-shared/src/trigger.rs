//! Object-store notification types.
//!
//! The shape follows the S3 event notification document. Every level is
//! optional so that a structurally incomplete event still deserializes and
//! can be rejected with a precise reason by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An invocation event carrying one or more object notifications.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TriggerEvent {
    /// Notification records. `None` when the field is absent.
    #[serde(rename = "Records", default)]
    pub records: Option<Vec<NotificationRecord>>,
}

impl TriggerEvent {
    /// Build an event holding a single notification for `bucket`/`key`.
    pub fn for_object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: Some(vec![NotificationRecord::new(bucket, key)]),
        }
    }

    /// Parse an event document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// One object notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NotificationRecord {
    #[serde(default)]
    pub s3: Option<NotificationS3>,
}

impl NotificationRecord {
    /// Create a notification for an object.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            s3: Some(NotificationS3 {
                bucket: Some(NotificationBucket {
                    name: Some(bucket.into()),
                }),
                object: Some(NotificationObject {
                    key: Some(key.into()),
                    size: None,
                }),
            }),
        }
    }

    /// The container (bucket) name, if present.
    pub fn bucket_name(&self) -> Option<&str> {
        self.s3
            .as_ref()?
            .bucket
            .as_ref()?
            .name
            .as_deref()
    }

    /// The raw object key as delivered in the notification (still URL-encoded).
    pub fn object_key(&self) -> Option<&str> {
        self.s3.as_ref()?.object.as_ref()?.key.as_deref()
    }
}

/// The `s3` entity of a notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NotificationS3 {
    #[serde(default)]
    pub bucket: Option<NotificationBucket>,
    #[serde(default)]
    pub object: Option<NotificationObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NotificationBucket {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NotificationObject {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A resolved object address in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    /// Container (bucket) identifier.
    pub bucket: String,
    /// Object key, already decoded.
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
