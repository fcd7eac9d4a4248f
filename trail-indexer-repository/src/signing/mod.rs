//! AWS Signature Version 4 request signing.
//!
//! This module holds the credentials type, the credential sources, and the
//! signer that turns a prepared request into an authorized one.

mod credentials;
mod sigv4;

pub use credentials::{AwsCredentialChain, SigningCredentials};
pub use sigv4::{RequestSigner, SignableRequest, SigningOutput};
