//! Shared run-state handle for driving the emulator from a worker thread.
//!
//! Only four pieces of state cross threads: the `halted`, `paused` and
//! `frame_ready` flags (single-byte atomics with acquire/release ordering)
//! and the mutex/condvar pair a paused worker sleeps on. Everything else in
//! the core is owned by whichever thread calls `Console::step`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

#[derive(Debug, Default)]
struct Shared {
    halted: AtomicBool,
    paused: AtomicBool,
    frame_ready: AtomicBool,
    pause_lock: Mutex<()>,
    pause_cv: Condvar,
}

/// Cloneable handle onto the emulator's run state.
///
/// The UI thread keeps a clone to pause, resume or halt a worker that is
/// inside [`crate::Console::run`]; the worker observes the flags once per
/// instruction, so cancellation is cooperative and nothing blocks except
/// the paused wait itself.
#[derive(Debug, Clone, Default)]
pub struct Control {
    shared: Arc<Shared>,
}

impl Control {
    /// Fresh handle: running, no frame published.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the CPU executed STP or a caller invoked [`Control::halt`].
    #[must_use]
    pub fn halted(&self) -> bool {
        self.shared.halted.load(Ordering::Acquire)
    }

    /// Stop the run loop. Also wakes a paused worker so it can exit.
    pub fn halt(&self) {
        self.shared.halted.store(true, Ordering::Release);
        self.shared.pause_cv.notify_all();
    }

    /// Clear the halt and frame flags on reset.
    pub(crate) fn clear_run_flags(&self) {
        self.shared.halted.store(false, Ordering::Release);
        self.shared.frame_ready.store(false, Ordering::Release);
    }

    /// True while the run loop is parked.
    #[must_use]
    pub fn paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Park the run loop before its next instruction. Introspection of
    /// registers and memory is safe once the worker is parked.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::Release);
    }

    /// Atomically clear `paused` and wake the worker.
    pub fn resume(&self) {
        {
            let _guard = self
                .shared
                .pause_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.shared.paused.store(false, Ordering::Release);
        }
        self.shared.pause_cv.notify_all();
    }

    /// Block while paused; returns promptly once resumed or halted.
    pub(crate) fn wait_while_paused(&self) {
        let mut guard = self
            .shared
            .pause_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while self.paused() && !self.halted() {
            guard = self
                .shared
                .pause_cv
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// True once a frame has been published and not yet acknowledged.
    #[must_use]
    pub fn frame_ready(&self) -> bool {
        self.shared.frame_ready.load(Ordering::Acquire)
    }

    /// Publish a completed frame. The buffer swap happens-before this store.
    pub(crate) fn publish_frame(&self) {
        self.shared.frame_ready.store(true, Ordering::Release);
    }

    /// UI-side acknowledgement that the frame was consumed.
    pub fn acknowledge_frame(&self) {
        self.shared.frame_ready.store(false, Ordering::Release);
    }
}
