//! Tracing subscriber setup for binaries and tests.
//!
//! `TRAFFIC_LIGHT_LOG` takes precedence over the verbosity passed in, and
//! accepts any `EnvFilter` directive (e.g. `TrafficLightMini=trace`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV_VAR: &str = "TRAFFIC_LIGHT_LOG";

/// Maps `-v` repetitions to a tracing directive.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"`
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global fmt subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
