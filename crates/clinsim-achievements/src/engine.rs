//! TOML-driven achievement rules.
//!
//! `TomlAchievementBook` loads an `AchievementConfig` from a TOML string or
//! file and implements the `AchievementRules` trait from clinsim-core.
//!
//! Each condition is a pure predicate over `PlayerStats`. Evaluation keeps
//! table order and never looks at previously granted badges; merging with
//! persisted grants is the engine's job.

use std::path::Path;

use tracing::debug;

use clinsim_contracts::{
    achievement::{Achievement, AchievementCondition, AchievementId},
    error::{ClinsimError, ClinsimResult},
    stats::PlayerStats,
};
use clinsim_core::traits::AchievementRules;

use crate::rule::AchievementConfig;

const BUILTIN_TABLE: &str = include_str!("../achievements.toml");

/// An `AchievementRules` implementation backed by a TOML table.
///
/// ```rust,ignore
/// use clinsim_achievements::engine::TomlAchievementBook;
///
/// let book = TomlAchievementBook::builtin()?;
/// ```
#[derive(Debug, Clone)]
pub struct TomlAchievementBook {
    config: AchievementConfig,
}

impl TomlAchievementBook {
    /// Parse and validate `s` as an achievement table.
    ///
    /// Returns `ClinsimError::ConfigError` if the TOML is malformed, does not
    /// match `AchievementConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> ClinsimResult<Self> {
        let config: AchievementConfig = toml::from_str(s).map_err(|e| ClinsimError::ConfigError {
            reason: format!("failed to parse achievement TOML: {}", e),
        })?;
        config.validate()?;
        debug!(achievements = config.achievements.len(), "achievement table loaded");
        Ok(Self { config })
    }

    pub fn from_file(path: &Path) -> ClinsimResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClinsimError::ConfigError {
            reason: format!("failed to read achievement file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The table shipped with the crate.
    pub fn builtin() -> ClinsimResult<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    pub fn find(&self, id: &AchievementId) -> ClinsimResult<&Achievement> {
        self.config
            .achievements
            .iter()
            .find(|a| &a.id == id)
            .ok_or_else(|| ClinsimError::UnknownAchievement {
                achievement_id: id.to_string(),
            })
    }

    /// Evaluate one condition against `stats`.
    pub fn is_satisfied(condition: &AchievementCondition, stats: &PlayerStats) -> bool {
        match condition {
            AchievementCondition::MinSessions { count } => stats.total_sessions >= *count,
            AchievementCondition::MinPerfectScores { count } => stats.perfect_scores >= *count,
            AchievementCondition::CaseScoreAtLeast { case_id, score } => {
                stats.best_score(case_id) >= *score
            }
            AchievementCondition::AllCasesCompleted => stats.all_cases_completed,
            AchievementCondition::MinTotalPoints { points } => stats.total_points >= *points,
        }
    }
}

impl AchievementRules for TomlAchievementBook {
    fn all(&self) -> &[Achievement] {
        &self.config.achievements
    }

    fn is_unlocked(&self, achievement: &Achievement, stats: &PlayerStats) -> bool {
        Self::is_satisfied(&achievement.condition, stats)
    }
}
