use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::detector::{Vocabulary, DEFAULT_SIGNS};
use crate::error::ConfigError;
use crate::kernel::time::frames_for_ms;

pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent";

pub const ENV_API_KEY: &str = "ISHAARA_GEMINI_API_KEY";
pub const ENV_ENDPOINT: &str = "ISHAARA_ENDPOINT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IshaaraConfig {
    pub detection_interval_ms: u64,
    pub debounce_ms: u64,
    /// Buffers whose length falls in `short_circuit_min..=short_circuit_max`
    /// are joined locally instead of sent to the remote assembler.
    pub short_circuit_min: usize,
    pub short_circuit_max: usize,
    pub vocabulary: Vec<String>,
    pub endpoint: String,
    pub api_key: String,
    pub request_timeout_ms: Option<u64>,
    /// When false, a response without generated text counts as an empty
    /// translation instead of a failure, and a JSON body on a non-2xx status
    /// is decoded rather than rejected.
    pub empty_completion_is_error: bool,
}

impl Default for IshaaraConfig {
    fn default() -> Self {
        Self {
            detection_interval_ms: 2000,
            debounce_ms: 2000,
            short_circuit_min: 2,
            short_circuit_max: 3,
            vocabulary: DEFAULT_SIGNS.iter().map(|s| s.to_string()).collect(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            request_timeout_ms: None,
            empty_completion_is_error: true,
        }
    }
}

impl IshaaraConfig {
    /// Defaults, then the optional JSON file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                info!("Loading config from {}", p.display());
                Self::from_json(&std::fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Takes a lookup closure so tests need not touch process env.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection_interval_ms == 0 {
            return Err(ConfigError::Invalid("detection_interval_ms must be positive".into()));
        }
        if self.short_circuit_min > self.short_circuit_max {
            return Err(ConfigError::Invalid(format!(
                "short_circuit_min ({}) exceeds short_circuit_max ({})",
                self.short_circuit_min, self.short_circuit_max
            )));
        }
        if self.vocabulary().is_empty() {
            return Err(ConfigError::Invalid("vocabulary is empty".into()));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(self.vocabulary.iter().cloned())
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            detection_frames: frames_for_ms(self.detection_interval_ms),
            debounce_frames: frames_for_ms(self.debounce_ms),
            short_circuit_min: self.short_circuit_min,
            short_circuit_max: self.short_circuit_max,
            empty_completion_is_error: self.empty_completion_is_error,
        }
    }
}

/// Frame-based knobs handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub detection_frames: u64,
    pub debounce_frames: u64,
    pub short_circuit_min: usize,
    pub short_circuit_max: usize,
    pub empty_completion_is_error: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        IshaaraConfig::default().controller_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_two_second_cadence() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.detection_frames, 20);
        assert_eq!(cfg.debounce_frames, 20);
        assert_eq!((cfg.short_circuit_min, cfg.short_circuit_max), (2, 3));
        assert!(cfg.empty_completion_is_error);
    }

    #[test]
    fn json_overrides_only_named_fields() {
        let cfg = IshaaraConfig::from_json(r#"{ "debounce_ms": 500, "vocabulary": ["yes", "no"] }"#).unwrap();
        assert_eq!(cfg.debounce_ms, 500);
        assert_eq!(cfg.detection_interval_ms, 2000);
        assert_eq!(cfg.vocabulary().len(), 2);
    }

    #[test]
    fn env_overrides_key_and_endpoint() {
        let mut cfg = IshaaraConfig::default();
        cfg.apply_env(|k| match k {
            ENV_API_KEY => Some(" secret ".to_string()),
            ENV_ENDPOINT => Some("http://localhost:9000/gen".to_string()),
            _ => None,
        });
        assert_eq!(cfg.api_key, "secret");
        assert_eq!(cfg.endpoint, "http://localhost:9000/gen");
    }

    #[test]
    fn rejects_inverted_short_circuit_range() {
        let err = IshaaraConfig::from_json(r#"{ "short_circuit_min": 4, "short_circuit_max": 3 }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_vocabulary() {
        let err = IshaaraConfig::from_json(r#"{ "vocabulary": [" "] }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }
}
