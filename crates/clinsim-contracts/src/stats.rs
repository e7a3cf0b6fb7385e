//! Aggregate player statistics, derived from attempt history.
//!
//! None of these types are stored. They are recomputed from the full attempt
//! list on every read; a persisted copy would only ever be a cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    case::CaseId,
    session::{AttemptId, UserId},
    step::EvaluationStep,
};

/// The snapshot achievement rules are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Sum of the best total per case. Repeat attempts never inflate it.
    pub total_points: u32,
    /// Every attempt counts, including repeats of the same case.
    pub total_sessions: u32,
    /// Best total score per attempted case.
    pub best_scores: BTreeMap<CaseId, u32>,
    /// Cases whose best score equals the perfect score.
    pub perfect_scores: u32,
    /// Every case in the active catalog has been cleared.
    pub all_cases_completed: bool,
}

impl PlayerStats {
    pub fn best_score(&self, case_id: &CaseId) -> u32 {
        self.best_scores.get(case_id).copied().unwrap_or(0)
    }
}

/// The best attempt a user has on one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseProgress {
    pub case_id: CaseId,
    pub best_score: u32,
    /// The attempt whose score is reported; `cleared` refers to this attempt.
    pub best_attempt: AttemptId,
    pub cleared: bool,
    pub attempts: u32,
}

/// Everything `getUserStats` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsReport {
    pub user_id: UserId,
    pub stats: PlayerStats,
    /// One entry per attempted case, ordered by case id.
    pub progress: Vec<CaseProgress>,
    /// Mean step score across all attempts, rounded half away from zero.
    pub performance_by_step: BTreeMap<EvaluationStep, u32>,
    /// Mean attempt total, rounded half away from zero.
    pub average_score: u32,
    pub cases_attempted: u32,
}
