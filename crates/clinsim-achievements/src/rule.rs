//! Achievement table schema.
//!
//! An `AchievementConfig` is deserialized from TOML and holds the ordered
//! list of achievements. Table order is display order; it is also the order
//! of the `unlocked` and `locked` lists in an achievement report.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use clinsim_contracts::{
    achievement::{Achievement, AchievementCondition},
    error::{ClinsimError, ClinsimResult},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementConfig {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl AchievementConfig {
    /// Reject duplicate ids, blank names, and zero thresholds.
    pub fn validate(&self) -> ClinsimResult<()> {
        let mut seen = BTreeSet::new();
        for achievement in &self.achievements {
            if achievement.id.as_str().trim().is_empty() || achievement.name.trim().is_empty() {
                return Err(ClinsimError::ConfigError {
                    reason: format!("achievement '{}' needs a non-empty id and name", achievement.id),
                });
            }
            if !seen.insert(achievement.id.clone()) {
                return Err(ClinsimError::ConfigError {
                    reason: format!("duplicate achievement id '{}'", achievement.id),
                });
            }
            let zero = match &achievement.condition {
                AchievementCondition::MinSessions { count }
                | AchievementCondition::MinPerfectScores { count } => *count == 0,
                AchievementCondition::CaseScoreAtLeast { score, .. } => *score == 0,
                AchievementCondition::MinTotalPoints { points } => *points == 0,
                AchievementCondition::AllCasesCompleted => false,
            };
            if zero {
                return Err(ClinsimError::ConfigError {
                    reason: format!(
                        "achievement '{}' has a zero threshold and would unlock for everyone",
                        achievement.id
                    ),
                });
            }
        }
        Ok(())
    }
}
