//! Tracing subscriber setup for binaries and demos
//!
//! The library only emits events; installing a subscriber is up to the host.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter,
};

/// Install a stderr formatter filtered by `RUST_LOG` (default `info`)
///
/// Span close events with their durations are logged when debug output is
/// enabled. Calling this more than once keeps the first subscriber.
pub fn init() {
    init_with_default("info");
}

/// Like [`init`] with a different fallback filter when `RUST_LOG` is unset
pub fn init_with_default(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let is_debug = env_filter.to_string().contains("debug")
        || std::env::var("RUST_LOG").unwrap_or_default().contains("debug");

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
