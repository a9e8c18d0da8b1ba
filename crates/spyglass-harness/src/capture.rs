//! Observer that records rendered log lines instead of printing them.

use std::sync::{Arc, Mutex};

use spyglass_core::{render_line, Direction, PacketObserver};
use spyglass_proto::Frame;

/// Records the exact lines the stdout observer would print.
#[derive(Debug, Default)]
pub struct CaptureObserver {
    lines: Mutex<Vec<String>>,
}

impl CaptureObserver {
    /// Create a shareable capture.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the captured lines, in observation order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("capture mutex poisoned").clone()
    }
}

impl PacketObserver for CaptureObserver {
    fn observe(&self, direction: Direction, frame: &Frame) {
        self.lines
            .lock()
            .expect("capture mutex poisoned")
            .push(render_line(direction, frame));
    }
}
