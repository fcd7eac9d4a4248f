//! Result types for delivery operations.

/// What the indexing endpoint answered for one delivered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// HTTP status code of the response.
    pub status: u16,
    /// The response body, accumulated from all received chunks.
    pub body: String,
}

impl DeliveryReport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the backend answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
