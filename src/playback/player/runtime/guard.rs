//! Liveness guard for render-loop threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Keeps a thread-liveness flag in sync with loop lifetime.
///
/// `play()` consults these flags before spawning, so a panicking loop must
/// still clear its flag on unwind.
pub(super) struct RenderThreadGuard {
    alive: Arc<AtomicBool>,
}

impl RenderThreadGuard {
    /// Mark the thread as alive.
    pub(super) fn new(alive: Arc<AtomicBool>) -> Self {
        alive.store(true, Ordering::SeqCst);
        Self { alive }
    }
}

impl Drop for RenderThreadGuard {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
