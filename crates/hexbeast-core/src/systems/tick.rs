//! Fixed-interval tick clock.
//!
//! Converts variable frame time into whole ticks. Leftover time carries to
//! the next call, so the tick rate is independent of the frame rate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    /// Seconds per tick.
    interval: f32,
    accumulator: f32,
    tick: u64,
    max_per_advance: u32,
}

impl TickClock {
    pub fn new(interval: f32, max_per_advance: u32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            accumulator: 0.0,
            tick: 0,
            max_per_advance: max_per_advance.max(1),
        }
    }

    /// Add elapsed seconds and return how many ticks are due.
    ///
    /// At most `max_per_advance` ticks are returned; any excess time beyond
    /// that is discarded. Negative and non-finite deltas count as zero.
    pub fn advance(&mut self, delta_seconds: f32) -> u32 {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.accumulator += delta_seconds;
        }
        if !self.accumulator.is_finite() {
            self.accumulator = 0.0;
        }
        let mut due = 0;
        while self.accumulator >= self.interval && due < self.max_per_advance {
            self.accumulator -= self.interval;
            due += 1;
        }
        if due == self.max_per_advance && self.accumulator >= self.interval {
            log::debug!(
                "tick clock behind by {:.2}s, dropping backlog",
                self.accumulator
            );
            self.accumulator %= self.interval;
        }
        due
    }

    /// Record that one tick ran; returns the new tick number.
    pub fn step(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Fraction of the way to the next tick, for interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.interval).clamp(0.0, 1.0)
    }
}

/// True every `interval` ticks (tick 0 excluded).
pub fn is_due(tick: u64, interval: u64) -> bool {
    interval > 0 && tick > 0 && tick % interval == 0
}
