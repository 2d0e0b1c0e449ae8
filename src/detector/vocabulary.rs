use serde::{Deserialize, Serialize};
use std::fmt;

/// One recognised gesture, drawn from the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignLabel(String);

impl SignLabel {
    pub fn new(label: impl Into<String>) -> Self {
        SignLabel(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignLabel {
    fn from(s: &str) -> Self {
        SignLabel::new(s)
    }
}

/// Labels the bundled gesture model was trained on.
pub const DEFAULT_SIGNS: [&str; 18] = [
    "I",
    "afternoon",
    "bye",
    "deaf",
    "good",
    "hello",
    "home",
    "how are you",
    "i am fine",
    "indian",
    "live",
    "morning",
    "namaste",
    "name",
    "sorry",
    "thank you",
    "time",
    "yes",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<SignLabel>,
}

impl Vocabulary {
    /// Builds a vocabulary, dropping blanks and duplicates while keeping order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<SignLabel> = Vec::new();
        for raw in labels {
            let label = raw.into();
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let label = SignLabel::new(label);
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self { labels: out }
    }

    pub fn contains(&self, label: &SignLabel) -> bool {
        self.labels.contains(label)
    }

    pub fn labels(&self) -> &[SignLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::new(DEFAULT_SIGNS)
    }
}
