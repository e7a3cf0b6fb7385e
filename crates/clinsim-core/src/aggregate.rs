//! Folding attempt history into player statistics.
//!
//! Everything here is a pure function of the attempt list, which is expected
//! in append order. Only the best attempt per case feeds the totals, so a
//! weaker replay never lowers a player's standing.

use std::collections::BTreeMap;

use clinsim_contracts::{
    case::CaseId,
    rubric::ProgressionConfig,
    session::{SessionAttempt, UserId},
    stats::{CaseProgress, PlayerStats, UserStatsReport},
    step::EvaluationStep,
};

/// Computes `PlayerStats` and the richer user report from attempt history.
#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    progression: ProgressionConfig,
}

impl SessionAggregator {
    pub fn new(progression: ProgressionConfig) -> Self {
        Self { progression }
    }

    pub fn progression(&self) -> &ProgressionConfig {
        &self.progression
    }

    /// Best attempt per case, keyed by case id.
    ///
    /// On equal totals the earliest attempt wins. `cleared` is derived from
    /// the winning attempt's total, so it always describes that same attempt.
    pub fn case_progress(&self, attempts: &[SessionAttempt]) -> BTreeMap<CaseId, CaseProgress> {
        let mut progress: BTreeMap<CaseId, CaseProgress> = BTreeMap::new();

        for attempt in attempts {
            match progress.get_mut(&attempt.case_id) {
                Some(entry) => {
                    entry.attempts += 1;
                    if attempt.total_score > entry.best_score {
                        entry.best_score = attempt.total_score;
                        entry.best_attempt = attempt.attempt_id;
                        entry.cleared = self.progression.is_cleared(attempt.total_score);
                    }
                }
                None => {
                    progress.insert(
                        attempt.case_id.clone(),
                        CaseProgress {
                            case_id: attempt.case_id.clone(),
                            best_score: attempt.total_score,
                            best_attempt: attempt.attempt_id,
                            cleared: self.progression.is_cleared(attempt.total_score),
                            attempts: 1,
                        },
                    );
                }
            }
        }

        progress
    }

    pub fn best_score_per_case(&self, attempts: &[SessionAttempt]) -> BTreeMap<CaseId, u32> {
        self.case_progress(attempts)
            .into_iter()
            .map(|(case_id, p)| (case_id, p.best_score))
            .collect()
    }

    /// Aggregate statistics over `attempts`.
    ///
    /// `catalog` is the active case list; `all_cases_completed` requires a
    /// non-empty catalog whose every case has been cleared.
    pub fn player_stats(&self, attempts: &[SessionAttempt], catalog: &[CaseId]) -> PlayerStats {
        let progress = self.case_progress(attempts);

        let best_scores: BTreeMap<CaseId, u32> = progress
            .iter()
            .map(|(case_id, p)| (case_id.clone(), p.best_score))
            .collect();

        let total_points = best_scores.values().sum();
        let perfect_scores = best_scores
            .values()
            .filter(|score| self.progression.is_perfect(**score))
            .count() as u32;

        let all_cases_completed = !catalog.is_empty()
            && catalog
                .iter()
                .all(|id| progress.get(id).map(|p| p.cleared).unwrap_or(false));

        PlayerStats {
            total_points,
            total_sessions: attempts.len() as u32,
            best_scores,
            perfect_scores,
            all_cases_completed,
        }
    }

    /// Mean score per step across every attempt, rounded half away from zero.
    ///
    /// All five steps are present; an empty history yields zeros.
    pub fn performance_by_step(&self, attempts: &[SessionAttempt]) -> BTreeMap<EvaluationStep, u32> {
        EvaluationStep::ORDER
            .iter()
            .map(|step| {
                let sum: u32 = attempts.iter().map(|a| a.step_score(*step)).sum();
                (*step, rounded_mean(sum, attempts.len() as u32))
            })
            .collect()
    }

    pub fn user_report(
        &self,
        user_id: &UserId,
        attempts: &[SessionAttempt],
        catalog: &[CaseId],
    ) -> UserStatsReport {
        let stats = self.player_stats(attempts, catalog);
        let progress: Vec<CaseProgress> = self.case_progress(attempts).into_values().collect();
        let total: u32 = attempts.iter().map(|a| a.total_score).sum();

        UserStatsReport {
            user_id: user_id.clone(),
            cases_attempted: progress.len() as u32,
            average_score: rounded_mean(total, attempts.len() as u32),
            performance_by_step: self.performance_by_step(attempts),
            progress,
            stats,
        }
    }
}

/// `sum / count` rounded half away from zero; zero when `count` is zero.
fn rounded_mean(sum: u32, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    (2 * sum + count) / (2 * count)
}
