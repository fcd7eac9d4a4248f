//! Signed HTTP delivery to the indexing endpoint.

mod client;

pub use client::{SignedDeliveryClient, SignedRequest};
