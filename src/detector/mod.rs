//! Sources of sign observations.
//!
//! The controller only sees the [`Detector`] trait, so a real gesture model
//! can replace the mock implementations without touching session logic.

pub mod vocabulary;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

pub use vocabulary::{SignLabel, Vocabulary, DEFAULT_SIGNS};

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub label: SignLabel,
    pub confidence: f32,
}

impl Observation {
    pub fn new(label: impl Into<SignLabel>, confidence: f32) -> Self {
        Self { label: label.into(), confidence }
    }
}

pub trait Detector: Send {
    /// Called once per detection cadence. `None` means nothing was recognised
    /// in this window.
    fn next_observation(&mut self) -> Option<Observation>;
}

const MOCK_CONFIDENCE: f32 = 0.95;

/// Picks a label uniformly at random from the vocabulary.
pub struct RandomDetector {
    vocabulary: Vocabulary,
    rng: StdRng,
}

impl RandomDetector {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary, rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence for demos and tests.
    pub fn seeded(vocabulary: Vocabulary, seed: u64) -> Self {
        Self { vocabulary, rng: StdRng::seed_from_u64(seed) }
    }
}

impl Detector for RandomDetector {
    fn next_observation(&mut self) -> Option<Observation> {
        self.vocabulary
            .labels()
            .choose(&mut self.rng)
            .map(|label| Observation { label: label.clone(), confidence: MOCK_CONFIDENCE })
    }
}

/// Replays a fixed queue of observations, then goes quiet.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    queue: VecDeque<Option<Observation>>,
}

impl ScriptedDetector {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SignLabel>,
    {
        Self {
            queue: labels
                .into_iter()
                .map(|l| Some(Observation::new(l, MOCK_CONFIDENCE)))
                .collect(),
        }
    }

    /// Queue an empty window (no sign recognised).
    pub fn push_miss(&mut self) {
        self.queue.push_back(None);
    }
}

impl Detector for ScriptedDetector {
    fn next_observation(&mut self) -> Option<Observation> {
        self.queue.pop_front().flatten()
    }
}
