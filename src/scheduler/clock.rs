/// Monotonic time sources for the scheduler
use std::cell::Cell;
use tokio::time::Instant;

use crate::models::Tick;
use crate::utils::ticks_to_duration;

/// Source of the current tick
pub trait Clock {
    fn now(&self) -> Tick;
}

/// Wall-clock ticks counted from node start
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        MonotonicClock {
            start: Instant::now(),
        }
    }

    /// Instant at which the clock will read `tick`
    pub fn instant_at(&self, tick: Tick) -> Instant {
        self.start + ticks_to_duration(tick)
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Tick {
        self.start.elapsed().as_millis() as Tick
    }
}

/// Hand-driven clock for deterministic runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Tick>,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        ManualClock {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, tick: Tick) {
        self.now.set(tick);
    }

    pub fn advance(&self, ticks: Tick) {
        self.now.set(self.now.get().saturating_add(ticks));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        self.now.get()
    }
}
