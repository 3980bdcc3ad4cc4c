//! Tracing initialisation helpers for tests.
//!
//! The subscriber is initialised at most once per process, so
//! [`init_test_tracing`] can be called from every test function.

use tracing_subscriber::EnvFilter;

/// Initialise a subscriber that writes to the test-harness writer and
/// respects `RUST_LOG` (default `debug` for imectx crates, `warn` otherwise).
///
/// # Example
///
/// ```ignore
/// #[test]
/// fn my_test() {
///     imectx_test_utils::tracing_setup::init_test_tracing();
///     imectx_core::detect_context("// x", false, 2);
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,imectx_core=debug,imectx_config=debug")),
        )
        .with_test_writer()
        .try_init();
}
