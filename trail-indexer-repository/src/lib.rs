//! # Trail Indexer Repository
//!
//! This crate provides the traits and implementations the pipeline uses to
//! reach the outside world: reading archives from the object store and
//! delivering records to the indexing endpoint over SigV4-signed HTTP.

pub mod config;
pub mod delivery;
pub mod errors;
pub mod interfaces;
pub mod s3;
pub mod signing;
pub mod types;

pub use config::DeliveryTarget;
pub use delivery::SignedDeliveryClient;
pub use errors::{DeliveryError, FetchError};
pub use interfaces::{ArchiveStore, Clock, CredentialSource, DocumentSink, SystemClock};
pub use s3::S3ArchiveStore;
pub use signing::{AwsCredentialChain, RequestSigner, SigningCredentials};
pub use types::DeliveryReport;
