//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [progression]
//! completion_threshold = 60
//! perfect_score = 100
//!
//! [rubric]
//! full_credit_percent = 60
//! partial_credit_divisor = 2
//! followup_full_matches = 2
//! reasoning_bonus = 5
//! reasoning_min_chars = 150
//! reasoning_markers = ["porque", "debido", "ya que", "dado que", "por lo tanto"]
//! ```
//!
//! Both tables and every key are optional; missing values take the defaults
//! shown above.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use clinsim_contracts::{
    error::{ClinsimError, ClinsimResult},
    rubric::{ProgressionConfig, RubricConfig},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub progression: ProgressionConfig,
    pub rubric: RubricConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// Returns `ClinsimError::ConfigError` if the TOML is malformed or any
    /// value is out of range.
    pub fn from_toml_str(s: &str) -> ClinsimResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| ClinsimError::ConfigError {
            reason: format!("failed to parse engine TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            completion_threshold = config.progression.completion_threshold,
            partial_credit_divisor = config.rubric.partial_credit_divisor,
            "engine configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClinsimResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClinsimError::ConfigError {
            reason: format!("failed to read engine config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> ClinsimResult<()> {
        self.progression.validate()?;
        self.rubric.validate()
    }
}

#[cfg(test)]
mod tests {
    use clinsim_contracts::error::ClinsimError;

    use super::EngineConfig;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.progression.completion_threshold, 60);
        assert_eq!(config.rubric.partial_credit_divisor, 2);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let toml = r#"
[progression]
completion_threshold = 70

[rubric]
reasoning_bonus = 10
"#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.progression.completion_threshold, 70);
        assert_eq!(config.progression.perfect_score, 100);
        assert_eq!(config.rubric.reasoning_bonus, 10);
        assert_eq!(config.rubric.full_credit_percent, 60);
        assert_eq!(config.rubric.reasoning_markers.len(), 5);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let err = EngineConfig::from_toml_str("[rubric]\npartial_credit_divisor = 0\n").unwrap_err();
        assert!(matches!(err, ClinsimError::ConfigError { .. }));
    }

    #[test]
    fn threshold_above_perfect_is_rejected() {
        let err = EngineConfig::from_toml_str("[progression]\ncompletion_threshold = 120\n").unwrap_err();
        assert!(err.to_string().contains("completion_threshold"));
    }

    #[test]
    fn reasoning_markers_must_be_lower_case_phrases() {
        for markers in [r#"["Porque"]"#, r#"["porque", ""]"#, r#"[" ya que"]"#] {
            let toml = format!("[rubric]\nreasoning_markers = {}\n", markers);
            let err = EngineConfig::from_toml_str(&toml).unwrap_err();
            assert!(matches!(err, ClinsimError::ConfigError { .. }), "{}", markers);
            assert!(err.to_string().contains("reasoning_markers"));
        }

        let config =
            EngineConfig::from_toml_str("[rubric]\nreasoning_markers = [\"por eso\"]\n").unwrap();
        assert_eq!(config.rubric.reasoning_markers, vec!["por eso".to_string()]);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("[progression\n").unwrap_err();
        assert!(matches!(err, ClinsimError::ConfigError { .. }));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = EngineConfig::from_file(std::path::Path::new("/nonexistent/clinsim.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
