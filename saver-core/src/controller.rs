//! Interrupt-shared countdown state
//!
//! The firmware interrupt handlers cannot hold a `SaverFsm` behind a
//! mutex, so the countdown lives in atomics that are safe to touch from
//! interrupt context. Writer discipline matches the single-writer rule
//! of the core design: the tick handler only decrements and clears
//! `running`; the activity handler (and boot) only reloads and sets it.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

/// Atomic countdown state shared between the tick and activity handlers
///
/// # Safety
/// All methods are safe to call from interrupt context.
pub struct SharedCountdown {
    countdown: AtomicU32,
    timeout: AtomicU32,
    running: AtomicBool,
}

impl SharedCountdown {
    /// Create a new shared countdown (static-friendly)
    pub const fn new() -> Self {
        Self {
            countdown: AtomicU32::new(0),
            timeout: AtomicU32::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Latch the boot-time timeout. Called exactly once, before the
    /// tick interrupt is armed; never re-evaluated afterwards.
    pub fn set_timeout(&self, ticks: u32) {
        self.timeout.store(ticks, Ordering::Relaxed);
    }

    /// Reload the countdown to the full timeout and mark it running.
    ///
    /// Activity-handler/boot path. Safe while already running.
    pub fn arm(&self) {
        let ticks = self.timeout.load(Ordering::Relaxed);
        self.countdown.store(ticks, Ordering::Relaxed);
        self.running.store(true, Ordering::Relaxed);
    }

    /// Stop the countdown without reloading it
    pub fn disarm(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Deliver one tick. Tick-handler path only.
    ///
    /// Returns true exactly when this tick ran the countdown out; the
    /// caller then stops the tick source and drops the relay.
    pub fn tick(&self) -> bool {
        if !self.running.load(Ordering::Relaxed) {
            return false;
        }

        let before = self.countdown.fetch_sub(1, Ordering::Relaxed);
        if before <= 1 {
            self.countdown.store(0, Ordering::Relaxed);
            self.running.store(false, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Check whether the countdown is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Remaining ticks (diagnostic; stale once stopped)
    pub fn remaining(&self) -> u32 {
        self.countdown.load(Ordering::Relaxed)
    }

    /// Latched timeout in ticks
    pub fn timeout(&self) -> u32 {
        self.timeout.load(Ordering::Relaxed)
    }

    /// Reset all state (for testing)
    #[cfg(feature = "test-utils")]
    pub fn reset(&self) {
        self.countdown.store(0, Ordering::Relaxed);
        self.timeout.store(0, Ordering::Relaxed);
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for SharedCountdown {
    fn default() -> Self {
        Self::new()
    }
}
