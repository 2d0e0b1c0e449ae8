use serde::Serialize;

use super::session::SessionPhase;
use crate::camera::Facing;
use crate::detector::{Observation, SignLabel};

/// Strict state delta. This is the ONLY way session state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    PhaseChanged(SessionPhase),
    FacingChanged(Facing),
    WordDetected(Observation),
    /// The buffer became `translation` and is emptied.
    Assembled { translation: String },
    Cleared,
    ErrorRaised(String),
    ErrorDismissed,
}

/// In-memory view of one translate session. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub facing: Facing,
    words: Vec<SignLabel>,
    pub translation: String,
    pub current_label: Option<SignLabel>,
    pub current_confidence: Option<f32>,
    pub error: Option<String>,
    /// Bumped by every applied delta.
    pub version: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn words(&self) -> &[SignLabel] {
        &self.words
    }

    pub fn camera_on(&self) -> bool {
        self.phase.camera_on()
    }

    pub fn running(&self) -> bool {
        self.phase.running()
    }

    /// Words joined the way the screen renders the pending sentence.
    pub fn pending_sentence(&self) -> String {
        join_words(&self.words, " ")
    }

    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::PhaseChanged(phase) => self.phase = phase,
            StateDelta::FacingChanged(facing) => self.facing = facing,
            StateDelta::WordDetected(obs) => {
                self.current_label = Some(obs.label.clone());
                self.current_confidence = Some(obs.confidence);
                self.words.push(obs.label);
            }
            StateDelta::Assembled { translation } => {
                self.words.clear();
                self.translation = translation;
            }
            StateDelta::Cleared => {
                self.words.clear();
                self.translation.clear();
            }
            StateDelta::ErrorRaised(msg) => self.error = Some(msg),
            StateDelta::ErrorDismissed => self.error = None,
        }
        self.version += 1;
    }
}

pub fn join_words(words: &[SignLabel], sep: &str) -> String {
    words.iter().map(SignLabel::as_str).collect::<Vec<_>>().join(sep)
}
