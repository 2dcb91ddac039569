//! Log output setup for test binaries.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "vigil=info";

/// Install a formatted `tracing` subscriber for tests.
///
/// Lines carry the timestamp, level, source file and line number. The filter
/// comes from `RUST_LOG` when set, otherwise `filter`. Safe to call from every
/// test: returns `false` if a global subscriber is already installed.
pub fn init_logging(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Install the test subscriber with [`DEFAULT_FILTER`].
pub fn init_test_logging() -> bool {
    init_logging(DEFAULT_FILTER)
}
