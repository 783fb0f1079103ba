//! Rebuild timers
//!
//! Plain accumulated-time counters, reset to zero when they fire.

use serde::{Deserialize, Serialize};

/// Fires once `interval` seconds have accumulated
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntervalTimer {
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `dt`; returns true (and resets) when the interval is reached
    ///
    /// An interval of zero fires on every tick.
    pub fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= interval.max(0.0) {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
