use super::event::{HapticPulse, RequestId};
use super::time::Tick;
use crate::detector::SignLabel;

/// Work the controller cannot do itself. Executed by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    RequestAssembly { request: RequestId, words: Vec<SignLabel> },
    Haptic(HapticPulse),
}

/// Repeating frame timer. Re-arms relative to the frame it fired on.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: u64,
    next: Option<Tick>,
}

impl Cadence {
    pub fn new(period: u64) -> Self {
        Self { period: period.max(1), next: None }
    }

    pub fn arm(&mut self, now: Tick) {
        self.next = Some(now.after(self.period));
    }

    pub fn disarm(&mut self) {
        self.next = None;
    }

    /// True once per period.
    pub fn poll(&mut self, now: Tick) -> bool {
        match self.next {
            Some(due) if due <= now => {
                self.next = Some(now.after(self.period));
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debounce: every `trigger` pushes the deadline out by the
/// full window, and `poll` fires once after a quiet window.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: u64,
    deadline: Option<Tick>,
}

impl Debounce {
    pub fn new(window: u64) -> Self {
        Self { window: window.max(1), deadline: None }
    }

    pub fn trigger(&mut self, now: Tick) {
        self.deadline = Some(now.after(self.window));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn poll(&mut self, now: Tick) -> bool {
        match self.deadline {
            Some(due) if due <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(frame: u64) -> Tick {
        Tick { frame }
    }

    #[test]
    fn cadence_fires_every_period() {
        let mut cadence = Cadence::new(20);
        assert!(!cadence.poll(at(100)));
        cadence.arm(at(0));
        let fired: Vec<u64> = (1..=60).filter(|f| cadence.poll(at(*f))).collect();
        assert_eq!(fired, vec![20, 40, 60]);
    }

    #[test]
    fn disarmed_cadence_is_silent() {
        let mut cadence = Cadence::new(5);
        cadence.arm(at(0));
        cadence.disarm();
        assert!((1..50).all(|f| !cadence.poll(at(f))));
    }

    #[test]
    fn debounce_coalesces_rapid_triggers() {
        let mut debounce = Debounce::new(20);
        debounce.trigger(at(0));
        debounce.trigger(at(5));
        debounce.trigger(at(10));
        let fired: Vec<u64> = (11..=60).filter(|f| debounce.poll(at(*f))).collect();
        assert_eq!(fired, vec![30]);
        assert!(!debounce.is_pending());
    }
}
