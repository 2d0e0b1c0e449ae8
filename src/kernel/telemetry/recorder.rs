use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(64),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::time::Tick;

    #[test]
    fn recorder_is_bounded() {
        let mut rec = TelemetryRecorder::new();
        for frame in 0..(MAX_EVENTS as u64 + 5) {
            rec.record(TelemetryEvent::DetectionMissed { tick: Tick { frame } });
        }
        assert_eq!(rec.len(), MAX_EVENTS);
        assert_eq!(rec.snapshot().detection_stats.missed, MAX_EVENTS as u64);
    }
}
