//! Achievement (badge) definitions and reports.
//!
//! An `Achievement` is pure data: the `condition` names a predicate kind and
//! its parameters. Interpretation lives in the achievement rule engine, so a
//! table can be declared in TOML while the predicates stay in code.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{case::CaseId, session::UserId, stats::PlayerStats};

/// Stable badge identifier, e.g. `AchievementId("high-scorer")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AchievementId(pub String);

impl AchievementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The predicate kinds a badge can be unlocked by.
///
/// In TOML:
/// ```toml
/// [achievements.condition]
/// kind = "min-total-points"
/// points = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AchievementCondition {
    /// `total_sessions >= count`.
    MinSessions { count: u32 },
    /// `perfect_scores >= count`.
    MinPerfectScores { count: u32 },
    /// Best score on `case_id` is at least `score`.
    CaseScoreAtLeast { case_id: CaseId, score: u32 },
    /// Every catalog case is cleared.
    AllCasesCompleted,
    /// `total_points >= points`.
    MinTotalPoints { points: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: AchievementCondition,
}

/// A badge the store has recorded as earned. Authoritative once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGrant {
    pub user_id: UserId,
    pub achievement_id: AchievementId,
    pub granted_at: DateTime<Utc>,
}

/// Everything `getUnlockedAchievements` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementReport {
    /// Computed plus previously granted badges, in table order.
    pub unlocked: Vec<Achievement>,
    /// Badges granted by this call.
    pub newly_unlocked: Vec<Achievement>,
    /// The rest of the table, for previewing upcoming goals.
    pub locked: Vec<Achievement>,
    pub stats: PlayerStats,
}
