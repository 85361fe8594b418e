//! Autosave cadence policy.
//!
//! The core owns the cadence, the platform owns the clock: the host feeds
//! elapsed time into [`Autosave::tick`] and performs a save whenever it
//! answers `true`. Explicit saves re-arm the interval, so a manual save
//! defers the next periodic one instead of stacking on top of it.
use std::time::Duration;

use crate::constants::AUTOSAVE_INTERVAL;

#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    since_save: Duration,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}

impl Autosave {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_save: Duration::ZERO,
        }
    }

    /// Accumulate elapsed time; returns whether a save is now due.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.since_save = self.since_save.saturating_add(elapsed);
        self.due()
    }

    /// Whether the interval has passed since the last save.
    #[must_use]
    pub fn due(&self) -> bool {
        self.since_save >= self.interval
    }

    /// Re-arm the interval after any save, periodic or explicit.
    pub fn mark_saved(&mut self) {
        self.since_save = Duration::ZERO;
    }
}
