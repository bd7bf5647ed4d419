//! Logging setup
//!
//! The library itself only emits `tracing` events. Binaries, benches and tests
//! call [`init_logging`] to get them printed.

use tracing::Level;

/// Install a global fmt subscriber at the given level.
///
/// Safe to call more than once: later calls are no-ops, which lets every test
/// call it unconditionally.
pub fn init_logging(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_test_writer()
        .with_target(true)
        .try_init();
}
