//! Logging setup
//!
//! Every session event is emitted through `tracing`. Binaries call
//! [`init_logging`] once at startup; `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Output format for the global subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event
    #[default]
    Compact,
    /// One JSON object per event
    Json,
    /// Captured by the test harness
    Test,
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// stays in place.
pub fn init_logging(default_filter: &str, format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Test => builder.with_test_writer().try_init().is_ok(),
    }
}
