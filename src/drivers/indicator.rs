use log::info;

use crate::models::Tick;

/// Visual feedback on the node; never load-bearing
pub trait Indicator {
    fn pulse(&mut self, duration_ms: Tick);
}

/// Stand-in LED that records pulses in the log
#[derive(Debug, Default)]
pub struct LogIndicator;

impl Indicator for LogIndicator {
    fn pulse(&mut self, duration_ms: Tick) {
        info!("LED pulse for {} ms", duration_ms);
    }
}
