// Path: crates/telemetry/src/time.rs
use crate::sinks::StakingMetricsSink;
use std::time::Instant;

/// Reports the lifetime of the guard as the end-of-block duration when dropped.
pub struct Timer<'a> {
    sink: &'a dyn StakingMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Starts timing.
    pub fn new(sink: &'a dyn StakingMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_end_block_duration(self.start.elapsed().as_secs_f64());
    }
}
