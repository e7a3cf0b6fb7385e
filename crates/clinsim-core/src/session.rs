//! The per-case step state machine.
//!
//! A `CaseSession` walks the five evaluation steps in fixed order:
//!
//!   Diagnosis → Differential → Tests → Treatment → Followup → Completed
//!
//! Each step is scored exactly once. Submissions are checked before any
//! scoring work happens, so a rejected submission leaves the session exactly
//! as it was.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinsim_contracts::{
    case::{CaseDefinition, CaseId, StepWeights},
    error::{ClinsimError, ClinsimResult},
    evaluation::StepEvaluation,
    rubric::ProgressionConfig,
    session::{AttemptId, SessionAttempt, UserId},
    step::{EvaluationStep, StepCursor},
};

/// One in-progress play-through of one case by one user.
///
/// Serializable so a caller can park it between requests and hand it back
/// to the engine for the next submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSession {
    /// Also the id of the attempt recorded when the session completes.
    pub session_id: AttemptId,
    pub user_id: UserId,
    pub case_id: CaseId,
    pub case_name: String,
    pub started_at: DateTime<Utc>,
    weights: StepWeights,
    cursor: StepCursor,
    step_scores: BTreeMap<EvaluationStep, u32>,
    evaluations: Vec<StepEvaluation>,
    reasoning_bonus: u32,
}

impl CaseSession {
    pub fn start(user_id: UserId, case: &CaseDefinition) -> Self {
        Self {
            session_id: AttemptId::new(),
            user_id,
            case_id: case.id.clone(),
            case_name: case.name.clone(),
            started_at: Utc::now(),
            weights: case.weights,
            cursor: StepCursor::start(),
            step_scores: BTreeMap::new(),
            evaluations: Vec::new(),
            reasoning_bonus: 0,
        }
    }

    pub fn cursor(&self) -> StepCursor {
        self.cursor
    }

    /// The step awaiting an answer, or `None` once completed.
    pub fn current_step(&self) -> Option<EvaluationStep> {
        self.cursor.pending_step()
    }

    pub fn is_completed(&self) -> bool {
        self.cursor.is_completed()
    }

    pub fn step_score(&self, step: EvaluationStep) -> Option<u32> {
        self.step_scores.get(&step).copied()
    }

    pub fn step_scores(&self) -> &BTreeMap<EvaluationStep, u32> {
        &self.step_scores
    }

    /// Evaluations in the order they were recorded.
    pub fn evaluations(&self) -> &[StepEvaluation] {
        &self.evaluations
    }

    /// Sum of the recorded step scores. Never exceeds the rubric total.
    pub fn total(&self) -> u32 {
        self.step_scores.values().sum()
    }

    pub fn reasoning_bonus(&self) -> u32 {
        self.reasoning_bonus
    }

    pub fn is_cleared(&self, progression: &ProgressionConfig) -> bool {
        progression.is_cleared(self.total())
    }

    /// Check that `step` may be answered now, without changing anything.
    ///
    /// Checks run in this order: completed session, already-scored step,
    /// out-of-order step.
    pub fn check_submission(&self, step: EvaluationStep) -> ClinsimResult<()> {
        let expected = match self.cursor {
            StepCursor::Completed => {
                return Err(ClinsimError::SessionCompleted {
                    session_id: self.session_id.to_string(),
                });
            }
            StepCursor::Pending(expected) => expected,
        };

        if self.step_scores.contains_key(&step) {
            return Err(ClinsimError::StepAlreadyScored { step });
        }

        if step != expected {
            return Err(ClinsimError::StepOutOfOrder {
                expected,
                submitted: step,
            });
        }

        Ok(())
    }

    /// Record the evaluation for the current step and advance the cursor.
    ///
    /// The score is capped at the case's weight for the step. Returns the
    /// cursor after the transition.
    pub fn record(&mut self, evaluation: StepEvaluation) -> ClinsimResult<StepCursor> {
        let step = evaluation.step;
        self.check_submission(step)?;

        let score = evaluation.score.min(self.weights.for_step(step));
        self.step_scores.insert(step, score);
        self.reasoning_bonus += evaluation.reasoning_bonus;
        self.evaluations.push(evaluation);
        self.cursor = StepCursor::after(step);

        Ok(self.cursor)
    }

    /// The attempt record for a completed session.
    pub fn to_attempt(&self, progression: &ProgressionConfig) -> ClinsimResult<SessionAttempt> {
        if let StepCursor::Pending(pending) = self.cursor {
            return Err(ClinsimError::SessionIncomplete {
                session_id: self.session_id.to_string(),
                pending,
            });
        }

        let total_score = self.total();
        Ok(SessionAttempt {
            attempt_id: self.session_id,
            user_id: self.user_id.clone(),
            case_id: self.case_id.clone(),
            case_name: self.case_name.clone(),
            step_scores: self.step_scores.clone(),
            total_score,
            completed: true,
            cleared: progression.is_cleared(total_score),
            reasoning_bonus: self.reasoning_bonus,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use clinsim_contracts::{
        case::{CaseDefinition, CaseId},
        error::ClinsimError,
        evaluation::StepEvaluation,
        rubric::ProgressionConfig,
        session::UserId,
        step::{EvaluationStep, StepCursor},
    };

    use crate::testing::sample_case;

    use super::CaseSession;

    fn scored(step: EvaluationStep, score: u32, max_score: u32) -> StepEvaluation {
        let mut evaluation = StepEvaluation::fallback(step, max_score, "test");
        evaluation.score = score;
        evaluation
    }

    fn session(case: &CaseDefinition) -> CaseSession {
        CaseSession::start(UserId::from("user-1"), case)
    }

    fn complete_with(case: &CaseDefinition, scores: [u32; 5]) -> CaseSession {
        let mut s = session(case);
        for (step, score) in EvaluationStep::ORDER.iter().zip(scores) {
            s.record(scored(*step, score, case.weight_for(*step))).unwrap();
        }
        s
    }

    #[test]
    fn fresh_session_starts_at_diagnosis() {
        let case = sample_case("case-a");
        let s = session(&case);
        assert_eq!(s.cursor(), StepCursor::Pending(EvaluationStep::Diagnosis));
        assert_eq!(s.total(), 0);
        assert!(!s.is_completed());
        assert_eq!(s.case_id, CaseId::from("case-a"));
    }

    #[test]
    fn record_advances_linearly_to_completed() {
        let case = sample_case("case-a");
        let mut s = session(&case);

        let mut cursors = Vec::new();
        for step in EvaluationStep::ORDER {
            cursors.push(s.record(scored(step, 1, case.weight_for(step))).unwrap());
        }

        assert_eq!(
            cursors,
            vec![
                StepCursor::Pending(EvaluationStep::Differential),
                StepCursor::Pending(EvaluationStep::Tests),
                StepCursor::Pending(EvaluationStep::Treatment),
                StepCursor::Pending(EvaluationStep::Followup),
                StepCursor::Completed,
            ]
        );
        assert!(s.is_completed());
        assert_eq!(s.total(), 5);
        assert_eq!(s.evaluations().len(), 5);
    }

    #[test]
    fn out_of_order_submission_is_rejected_without_state_change() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        let before = s.clone();

        let err = s.record(scored(EvaluationStep::Tests, 15, 15)).unwrap_err();
        match err {
            ClinsimError::StepOutOfOrder { expected, submitted } => {
                assert_eq!(expected, EvaluationStep::Diagnosis);
                assert_eq!(submitted, EvaluationStep::Tests);
            }
            other => panic!("expected StepOutOfOrder, got {:?}", other),
        }
        assert_eq!(s, before);
    }

    #[test]
    fn already_scored_step_is_reported_before_out_of_order() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        s.record(scored(EvaluationStep::Diagnosis, 40, 40)).unwrap();

        let err = s.record(scored(EvaluationStep::Diagnosis, 0, 40)).unwrap_err();
        assert!(matches!(
            err,
            ClinsimError::StepAlreadyScored { step: EvaluationStep::Diagnosis }
        ));
        assert_eq!(s.step_score(EvaluationStep::Diagnosis), Some(40));
    }

    #[test]
    fn completed_session_rejects_any_submission() {
        let case = sample_case("case-a");
        let mut s = complete_with(&case, [40, 20, 15, 15, 10]);

        let err = s.record(scored(EvaluationStep::Followup, 10, 10)).unwrap_err();
        assert!(matches!(err, ClinsimError::SessionCompleted { .. }));
        assert_eq!(s.total(), 100);
    }

    #[test]
    fn score_is_capped_at_step_weight() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        s.record(scored(EvaluationStep::Diagnosis, 90, 40)).unwrap();
        assert_eq!(s.step_score(EvaluationStep::Diagnosis), Some(40));
    }

    #[test]
    fn reasoning_bonus_accumulates_outside_total() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        let mut evaluation = scored(EvaluationStep::Diagnosis, 40, 40);
        evaluation.reasoning_bonus = 5;
        s.record(evaluation).unwrap();

        assert_eq!(s.total(), 40);
        assert_eq!(s.reasoning_bonus(), 5);
    }

    #[test]
    fn incomplete_session_has_no_attempt() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        s.record(scored(EvaluationStep::Diagnosis, 40, 40)).unwrap();

        let err = s.to_attempt(&ProgressionConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ClinsimError::SessionIncomplete { pending: EvaluationStep::Differential, .. }
        ));
    }

    #[test]
    fn attempt_mirrors_session_and_threshold_is_inclusive() {
        let case = sample_case("case-a");
        let progression = ProgressionConfig::default();

        let s = complete_with(&case, [40, 7, 7, 6, 0]);
        let attempt = s.to_attempt(&progression).unwrap();
        assert_eq!(attempt.attempt_id, s.session_id);
        assert_eq!(attempt.total_score, 60);
        assert_eq!(attempt.sum_of_steps(), 60);
        assert!(attempt.completed);
        assert!(attempt.cleared);

        let s = complete_with(&case, [40, 7, 7, 5, 0]);
        assert!(!s.to_attempt(&progression).unwrap().cleared);
    }

    #[test]
    fn session_survives_json_round_trip_mid_case() {
        let case = sample_case("case-a");
        let mut s = session(&case);
        s.record(scored(EvaluationStep::Diagnosis, 40, 40)).unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let mut restored: CaseSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, s);

        restored
            .record(scored(EvaluationStep::Differential, 15, 15))
            .unwrap();
        assert_eq!(restored.total(), 55);
    }
}
