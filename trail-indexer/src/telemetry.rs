//! Logging set-up.

use std::env;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` selects the filter (default `info`). `LOG_FORMAT=json`
/// switches to one JSON object per line, with span fields included so each
/// line carries the `invocation_id` of the run that produced it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    // A second call (tests) keeps the first subscriber.
    if json {
        let _ = builder
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .try_init();
    } else {
        let _ = builder.try_init();
    }
}
