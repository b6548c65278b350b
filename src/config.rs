//! Demo configuration
//!
//! Defaults come from the crate constants; a JSON file may override any
//! subset of fields, and CLI flags override the file.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::{ANALYSIS_PERIOD_MS, MAX_CANDIDATES, MIN_CONFIDENCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Raw observations considered per frame
    pub max_candidates: usize,
    /// Confidence threshold for keeping an observation
    pub min_confidence: f64,
    /// Minimum time between analysed frames (milliseconds)
    pub analysis_period_ms: u64,
    /// Announce the top label
    pub audio_enabled: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            max_candidates: MAX_CANDIDATES,
            min_confidence: MIN_CONFIDENCE,
            analysis_period_ms: ANALYSIS_PERIOD_MS,
            audio_enabled: true,
        }
    }
}

impl DemoConfig {
    /// Load from a JSON file, missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DemoConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_candidates == 0 {
            return Err(ConfigError::Invalid("max_candidates must be at least 1".into()));
        }
        if !self.min_confidence.is_finite() {
            return Err(ConfigError::Invalid("min_confidence must be a finite number".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.max_candidates, 11);
        assert_eq!(config.min_confidence, 0.1);
        assert_eq!(config.analysis_period_ms, 1000);
        assert!(config.audio_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DemoConfig = serde_json::from_str(r#"{"audio_enabled": false}"#).unwrap();
        assert!(!config.audio_enabled);
        assert_eq!(config.max_candidates, MAX_CANDIDATES);
    }

    #[test]
    fn test_rejects_zero_candidates() {
        let config = DemoConfig { max_candidates: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("visiontoy_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"analysis_period_ms": 250, "min_confidence": 0.2}"#).unwrap();

        let config = DemoConfig::from_file(&path).unwrap();
        assert_eq!(config.analysis_period_ms, 250);
        assert_eq!(config.min_confidence, 0.2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let result = DemoConfig::from_file("/nonexistent/visiontoy.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
