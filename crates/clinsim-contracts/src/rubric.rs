//! Scoring and progression constants.
//!
//! The partial-credit fraction and thresholds are product decisions, so they
//! live in configuration rather than in the scorer. The defaults reproduce
//! the canonical rubric.

use serde::{Deserialize, Serialize};

use crate::case::is_match_phrase;
use crate::error::{ClinsimError, ClinsimResult};

/// Dials for the compliance scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RubricConfig {
    /// Tests and treatment earn full weight when
    /// `matches * 100 >= full_credit_percent * |keywords|`.
    pub full_credit_percent: u32,
    /// The partial tier awards `weight / partial_credit_divisor`, rounded down.
    pub partial_credit_divisor: u32,
    /// Follow-up earns full weight at this many matches; one match is partial.
    pub followup_full_matches: u32,
    /// Points for documented clinical reasoning. Outside the rubric total.
    pub reasoning_bonus: u32,
    /// The answer must be strictly longer than this many characters.
    pub reasoning_min_chars: usize,
    /// Causal connectives that count as documented reasoning.
    pub reasoning_markers: Vec<String>,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            full_credit_percent: 60,
            partial_credit_divisor: 2,
            followup_full_matches: 2,
            reasoning_bonus: 5,
            reasoning_min_chars: 150,
            reasoning_markers: ["porque", "debido", "ya que", "dado que", "por lo tanto"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl RubricConfig {
    /// The partial-credit value for a step of the given weight.
    pub fn partial_credit(&self, weight: u32) -> u32 {
        weight / self.partial_credit_divisor.max(1)
    }

    pub fn validate(&self) -> ClinsimResult<()> {
        if self.partial_credit_divisor == 0 {
            return Err(ClinsimError::ConfigError {
                reason: "rubric.partial_credit_divisor must be at least 1".to_string(),
            });
        }
        if self.full_credit_percent > 100 {
            return Err(ClinsimError::ConfigError {
                reason: format!(
                    "rubric.full_credit_percent must be at most 100, found {}",
                    self.full_credit_percent
                ),
            });
        }
        if self.followup_full_matches == 0 {
            return Err(ClinsimError::ConfigError {
                reason: "rubric.followup_full_matches must be at least 1".to_string(),
            });
        }
        if let Some(bad) = self.reasoning_markers.iter().find(|m| !is_match_phrase(m)) {
            return Err(ClinsimError::ConfigError {
                reason: format!(
                    "rubric.reasoning_markers entry '{}' is not a trimmed lower-case phrase",
                    bad
                ),
            });
        }
        Ok(())
    }
}

/// Thresholds for "cleared" and "perfect".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// A case is cleared once its best total reaches this value.
    pub completion_threshold: u32,
    pub perfect_score: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            completion_threshold: 60,
            perfect_score: 100,
        }
    }
}

impl ProgressionConfig {
    pub fn is_cleared(&self, total: u32) -> bool {
        total >= self.completion_threshold
    }

    pub fn is_perfect(&self, total: u32) -> bool {
        total >= self.perfect_score
    }

    pub fn validate(&self) -> ClinsimResult<()> {
        if self.completion_threshold > self.perfect_score {
            return Err(ClinsimError::ConfigError {
                reason: format!(
                    "progression.completion_threshold ({}) exceeds perfect_score ({})",
                    self.completion_threshold, self.perfect_score
                ),
            });
        }
        Ok(())
    }
}
