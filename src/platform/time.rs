//! Frame clocks
//!
//! The clock only paces the loop. Game progress is counted in ticks, so a late
//! or early wake-up never changes the outcome of a move.

use std::time::{Duration, Instant};

/// Blocks until the next tick is due
pub trait FrameClock {
    fn wait_next_tick(&mut self);
}

/// Sleeps to hold a fixed tick rate
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    period: Duration,
    next: Instant,
}

impl FixedRateClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn from_rate(ticks_per_second: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / f64::from(ticks_per_second.max(1))))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameClock for FixedRateClock {
    fn wait_next_tick(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            // Fell behind: resync instead of bursting to catch up
            self.next = now + self.period;
        }
    }
}

/// Never waits (scripted playback and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpacedClock {
    pub ticks: u64,
}

impl FrameClock for UnpacedClock {
    fn wait_next_tick(&mut self) {
        self.ticks += 1;
    }
}
