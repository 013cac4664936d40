//! Common utilities for testing lander components.

pub mod ledger;
pub mod relay;
pub mod users;

pub use lander_constants::test_utils as test_constants;

/// Install a `tracing` subscriber honouring `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
