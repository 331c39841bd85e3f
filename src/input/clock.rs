//! Tick Clock
//!
//! Actions are evaluated against an explicit [`Frame`]: the tick index used
//! for per-tick memoization, the monotonic time used for multi-press
//! windows, and the key state for that tick.

use std::time::Duration;

use super::keys::KeySource;
use crate::TICK_RATE;

/// Evaluation context for one tick.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    /// Monotonically increasing tick index
    pub tick: u64,
    /// Monotonic time since the clock started
    pub time: Duration,
    /// Key state for this tick
    pub keys: &'a dyn KeySource,
}

impl<'a> Frame<'a> {
    /// Create a frame from its parts.
    pub fn new(tick: u64, time: Duration, keys: &'a dyn KeySource) -> Self {
        Self { tick, time, keys }
    }
}

/// Fixed-step clock producing tick indices and timestamps.
#[derive(Clone, Debug)]
pub struct FrameClock {
    tick: u64,
    time: Duration,
    dt: Duration,
}

impl FrameClock {
    /// Clock running at `tick_rate` ticks per second.
    ///
    /// A rate of 0 is treated as 1.
    pub fn new(tick_rate: u32) -> Self {
        Self::with_step(Duration::from_secs(1) / tick_rate.max(1))
    }

    /// Clock advancing by `dt` per tick.
    pub fn with_step(dt: Duration) -> Self {
        Self {
            tick: 0,
            time: Duration::ZERO,
            dt,
        }
    }

    /// Current tick index.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current time.
    #[inline]
    pub fn time(&self) -> Duration {
        self.time
    }

    /// Time per tick.
    #[inline]
    pub fn dt(&self) -> Duration {
        self.dt
    }

    /// Move to the next tick.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.time += self.dt;
        self.tick
    }

    /// Move to the next tick with an irregular time step (e.g. a stalled frame).
    pub fn advance_by(&mut self, elapsed: Duration) -> u64 {
        self.tick += 1;
        self.time += elapsed;
        self.tick
    }

    /// Evaluation context for the current tick.
    pub fn frame<'a>(&self, keys: &'a dyn KeySource) -> Frame<'a> {
        Frame::new(self.tick, self.time, keys)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

// =============================================================================
// TESTS
// =============================================================================
