//! Interface definitions for the pipeline's external collaborators.
//!
//! Each collaborator sits behind a trait so that the pipeline can be wired
//! to real services in production and to in-memory doubles in tests.

mod archive_store;
mod clock;
mod credential_source;
mod document_sink;

pub use archive_store::ArchiveStore;
pub use clock::{Clock, SystemClock};
pub use credential_source::CredentialSource;
pub use document_sink::DocumentSink;
