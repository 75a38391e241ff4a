//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber for the binary.
///
/// `RUST_LOG` selects the filter (default `info`), for example
/// `RUST_LOG=elevator_sim=debug` to see every cabin transition. Logs go to
/// stderr so the report on stdout stays machine-readable.
///
/// # Examples
///
/// ```no_run
/// elevator_sim::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber routed through the test harness's capture.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
