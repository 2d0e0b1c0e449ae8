use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::kernel::event::RequestId;
use crate::kernel::session::SessionPhase;
use crate::kernel::time::Tick;

// Allowed: IDs, Ticks, Counts, Enums
// Forbidden: sign labels, prompts, generated text

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    SessionTransition {
        from: SessionPhase,
        to: SessionPhase,
        tick: Tick,
    },

    Detection {
        tick: Tick,
        buffer_len: usize,
    },

    DetectionMissed {
        tick: Tick,
    },

    /// Detector produced a label outside the vocabulary.
    DetectionRejected {
        tick: Tick,
    },

    ShortCircuit {
        words: usize,
    },

    AssemblyRequested {
        request: RequestId,
        words: usize,
    },

    AssemblySucceeded {
        request: RequestId,
        latency_ticks: u64,
    },

    AssemblyFailed {
        request: RequestId,
        latency_ticks: u64,
        kind: AssemblyFailureKind,
    },

    StaleResponseDiscarded {
        request: RequestId,
    },

    Cleared {
        dropped_words: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblyFailureKind {
    Http,
    Status,
    Decode,
    EmptyCompletion,
}

impl From<&AssemblyError> for AssemblyFailureKind {
    fn from(err: &AssemblyError) -> Self {
        match err {
            AssemblyError::Http(_) => AssemblyFailureKind::Http, // message STRIPPED
            AssemblyError::Status(_) => AssemblyFailureKind::Status,
            AssemblyError::Decode(_) => AssemblyFailureKind::Decode, // message STRIPPED
            AssemblyError::EmptyCompletion => AssemblyFailureKind::EmptyCompletion,
        }
    }
}
