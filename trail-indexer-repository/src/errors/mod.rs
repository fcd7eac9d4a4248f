//! Error types for the trail indexer repository.

mod delivery_error;
mod fetch_error;

pub use delivery_error::DeliveryError;
pub use fetch_error::FetchError;
