use std::time::{Duration, Instant};

use cloudmine_core::constants::{DEFAULT_UNLOCK_TAPS, UNLOCK_TAP_WINDOW_MILLIS};
use tracing::{debug, info};

/// Counts rapid taps anywhere in the app.
///
/// A tap arriving more than `window` after the previous one restarts the
/// count (a gap of exactly `window` does not). Reaching `threshold` sets
/// `unlocked` and zeroes the count; `lock` clears both.
#[derive(Debug, Clone)]
pub struct SecretUnlock {
    threshold: u32,
    window: Duration,
    count: u32,
    last_tap: Option<Instant>,
    unlocked: bool,
}

impl SecretUnlock {
    pub fn new(threshold: u32) -> Self {
        Self::with_window(threshold, Duration::from_millis(UNLOCK_TAP_WINDOW_MILLIS))
    }

    pub fn with_window(threshold: u32, window: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            window,
            count: 0,
            last_tap: None,
            unlocked: false,
        }
    }

    /// Register a tap at `at`. Returns whether the gesture is unlocked.
    pub fn tap(&mut self, at: Instant) -> bool {
        if let Some(last) = self.last_tap {
            if at.saturating_duration_since(last) > self.window {
                self.count = 0;
            }
        }
        self.last_tap = Some(at);
        self.count += 1;

        if self.count >= self.threshold {
            if !self.unlocked {
                info!(taps = self.threshold, "secret gesture unlocked");
            }
            self.unlocked = true;
            self.count = 0;
        }
        self.unlocked
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
        self.count = 0;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for SecretUnlock {
    fn default() -> Self {
        Self::new(DEFAULT_UNLOCK_TAPS)
    }
}

/// Opens the admin overlay on the first click after the gesture unlocks,
/// then re-locks, so each completed tap sequence opens it exactly once.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    unlock: SecretUnlock,
    open: bool,
}

impl AdminGate {
    pub fn new(threshold: u32) -> Self {
        Self {
            unlock: SecretUnlock::new(threshold),
            open: false,
        }
    }

    /// Feed one click. Returns true when this click opened the overlay.
    pub fn click(&mut self, at: Instant) -> bool {
        let armed = self.unlock.is_unlocked();
        self.unlock.tap(at);
        if !armed {
            return false;
        }
        self.unlock.lock();
        self.open = true;
        debug!("admin overlay opened");
        true
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn progress(&self) -> (u32, u32) {
        (self.unlock.count(), self.unlock.threshold())
    }
}
