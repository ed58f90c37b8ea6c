use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const RUNNING: u8 = 0;
const DRAINING: u8 = 1;
const STOPPED: u8 = 2;

/// Execution phase of the command pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Accepting and executing commands
    Running,
    /// Shutdown requested; queued commands still execute, no new input
    Draining,
    /// Queue drained; workers exit, nothing is dispatched anymore
    Stopped,
}

/// Shared tri-state shutdown flag.
///
/// Cloning yields another handle to the same flag. Transitions go strictly
/// Running -> Draining -> Stopped and are performed with compare-and-swap,
/// so concurrent callers cannot skip a phase or revert one.
#[derive(Debug, Clone)]
pub struct EngineLifecycle {
    state: Arc<AtomicU8>,
}

impl EngineLifecycle {
    /// Create a lifecycle flag in the Running state
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RUNNING)),
        }
    }

    /// Current phase
    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::SeqCst) {
            RUNNING => LifecycleState::Running,
            DRAINING => LifecycleState::Draining,
            _ => LifecycleState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::SeqCst) == RUNNING
    }

    pub fn is_stopped(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STOPPED
    }

    /// Request shutdown: Running -> Draining.
    ///
    /// Returns true if this call performed the transition. Safe to call any
    /// number of times from any thread; once draining (or stopped) it is a
    /// no-op, so a `quit` followed by an `exit` does not restart anything.
    pub fn request_drain(&self) -> bool {
        self.state
            .compare_exchange(RUNNING, DRAINING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Complete shutdown: Draining -> Stopped.
    ///
    /// Called by whichever worker observes the queue empty while draining.
    /// Returns true for exactly one caller; from Running or Stopped it does
    /// nothing and returns false.
    pub fn finish_drain(&self) -> bool {
        self.state
            .compare_exchange(DRAINING, STOPPED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for EngineLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
