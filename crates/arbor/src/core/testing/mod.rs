use std::sync::Once;

/// A harness driving a core frame by frame.
pub mod harness;
/// Recording draw contexts and surfaces.
pub mod render;
/// Test widgets and event recorders.
pub mod widgets;

pub use harness::Harness;
pub use render::{DrawOp, RecordingContext, RecordingSurface};
pub use widgets::{EventLog, Log, TestWidget, event_log, record};

/// Guards the one-time subscriber installation.
static INIT: Once = Once::new();

/// Route `tracing` output to the test writer. Safe to call from every test.
pub fn init_logging() {
    INIT.call_once(|| {
        if tracing_subscriber::fmt()
            .with_test_writer()
            .compact()
            .try_init()
            .is_err()
        {
            tracing::debug!("a global subscriber was already installed");
        }
    });
}
