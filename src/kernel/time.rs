use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tick {
    pub frame: u64,
}

/// Wall-clock length of one controller frame.
pub const TICK_MS: u64 = 100;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }

    pub fn after(&self, frames: u64) -> Self {
        Tick { frame: self.frame + frames }
    }
}

/// Milliseconds to whole frames, rounding up. Never returns 0 so a timer always
/// lands on a later frame than the one that armed it.
pub fn frames_for_ms(ms: u64) -> u64 {
    ms.div_ceil(TICK_MS).max(1)
}
