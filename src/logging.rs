//! Tracing subscriber setup for the command-line front-end.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a verbosity count (`-v` repeated).
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "gridsim=info",
        1 => "gridsim=debug",
        _ => "gridsim=trace",
    }
}

/// Installs a stderr fmt layer filtered by `RUST_LOG`, falling back to the
/// verbosity default.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
