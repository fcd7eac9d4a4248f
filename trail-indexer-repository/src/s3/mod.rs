//! S3 implementation of the archive store.

mod client;

pub use client::S3ArchiveStore;
