//! Common functionality used across the test suites.

pub mod deployment;
pub mod doubles;
pub mod schemas;

use tracing_subscriber::EnvFilter;

/// Send `tracing` output to the test harness, filtered by `RUST_LOG` (default `debug`). Safe to
/// call from every test.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn logging_installs_a_subscriber_once() {
        super::init_logging();
        super::init_logging();

        assert!(tracing::dispatcher::has_been_set());
    }
}
