use crate::models::Tick;

/// Minimum spacing between two counted motion triggers
pub const DEFAULT_DEBOUNCE_MS: Tick = 2000;

/// Saturating motion counter with a debounce window
///
/// PIR sensors chatter on a single physical event. Triggers arriving before
/// `next_eligible` are dropped, so a burst counts once per window while the
/// total keeps accumulating between reports.
#[derive(Debug, Clone)]
pub struct MotionCounter {
    count: u16,
    next_eligible: Tick,
    debounce: Tick,
}

impl MotionCounter {
    pub fn new(debounce: Tick) -> Self {
        MotionCounter {
            count: 0,
            next_eligible: 0,
            debounce,
        }
    }

    /// Register a trigger seen at `now`; returns whether it was counted
    pub fn on_trigger(&mut self, now: Tick) -> bool {
        if now < self.next_eligible {
            return false;
        }

        self.next_eligible = now.saturating_add(self.debounce);
        self.count = self.count.saturating_add(1);
        true
    }

    /// Zero the count after a successful report; the debounce window stays
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn next_eligible(&self) -> Tick {
        self.next_eligible
    }
}

impl Default for MotionCounter {
    fn default() -> Self {
        MotionCounter::new(DEFAULT_DEBOUNCE_MS)
    }
}
