//! Time source used when signing requests.

use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// The delivery client reads it once per request, at send time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
