// Common test utilities

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

/// Install a subscriber that respects RUST_LOG.
/// Run tests with: RUST_LOG=resource_finder=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
