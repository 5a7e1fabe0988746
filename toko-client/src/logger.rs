//! Logging Infrastructure
//!
//! Structured logging setup for binaries, demos and integration tests.
//! The library itself only emits `tracing` events.

/// Initialize the logger at the default (info) level
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit level
///
/// `RUST_LOG` takes precedence when set. Safe to call more than once;
/// later calls are ignored.
pub fn init_logger_with_level(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
