//! Clocks and frame pacing.
//!
//! All times are milliseconds as `i64`, matching [`crate::FrameInfo`].

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Monotonic clock, milliseconds since the clock was created.
///
/// Only differences between readings are meaningful; wall-clock jumps do
/// not affect it.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: i64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// Frame budget in milliseconds for a target rate. A rate of 0 is treated as 1.
pub fn frame_time_ms(fps: u16) -> i64 {
    1000 / i64::from(fps.max(1))
}

/// Milliseconds left in the frame that started at `start_ms`.
///
/// Negative when the frame overran its budget.
pub fn until_end_of_frame(start_ms: i64, target_frame_ms: i64, now_ms: i64) -> i64 {
    target_frame_ms - (now_ms - start_ms)
}

/// Sleep for `ms` milliseconds; returns immediately for zero or negative values.
pub fn wait(ms: i64) {
    if ms <= 0 {
        return;
    }
    thread::sleep(Duration::from_millis(ms as u64));
}
