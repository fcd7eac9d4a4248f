//! Object-store read errors.

use thiserror::Error;

/// Errors that can occur while reading an archive from the object store.
///
/// A missing object, a permission denial and a transport failure are not
/// distinguished; callers only learn that the object could not be read.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// The object store rejected the read.
    #[error("Unable to read s3://{bucket}/{key}: {message}")]
    NotFoundOrAccess {
        bucket: String,
        key: String,
        message: String,
    },
}

impl FetchError {
    /// Create a not-found-or-access error.
    pub fn not_found_or_access(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NotFoundOrAccess {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}
