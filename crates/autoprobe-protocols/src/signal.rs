//! Cooperative stop signal shared between a session worker and its controller.

use std::sync::atomic::{AtomicBool, Ordering};

/// Signal for stopping an exploration session.
///
/// The session polls it only at round boundaries, so setting it never
/// interrupts a gesture or model call that is already in flight.
#[derive(Debug)]
pub struct StopSignal {
    stopped: AtomicBool,
}

impl StopSignal {
    /// Create a new, unset stop signal.
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
        }
    }

    /// Check if a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Request a stop.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Clear a previous stop request before starting a new session.
    pub fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
