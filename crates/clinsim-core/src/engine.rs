//! The engine: the public surface of the clinical simulation core.
//!
//! The engine enforces the submission pipeline for every answer:
//!
//!   Check cursor → Look up case → Score → Record → [Persist attempt]
//!
//! The cursor check runs before any scoring, so an out-of-order or repeated
//! submission never reaches the scorer. The attempt is persisted exactly when
//! the last step is recorded.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use clinsim_contracts::{
    achievement::{Achievement, AchievementId, AchievementReport},
    case::{CaseDefinition, CaseId, CaseSummary},
    chat::ChatTurn,
    error::{ClinsimError, ClinsimResult},
    evaluation::StepEvaluation,
    rubric::ProgressionConfig,
    session::{SessionAttempt, UserId},
    stats::{PlayerStats, UserStatsReport},
    step::{EvaluationStep, StepCursor},
};

use crate::aggregate::SessionAggregator;
use crate::persona::{normalize_transcript, patient_persona_prompt};
use crate::session::CaseSession;
use crate::traits::{
    AchievementRules, AchievementStore, AttemptStore, CaseSource, PatientVoice, StepScorer,
};

/// What one accepted submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub evaluation: StepEvaluation,
    /// The cursor after the transition.
    pub cursor: StepCursor,
    /// Running total after this step.
    pub total: u32,
    /// Set when this submission completed the session and the attempt was stored.
    pub attempt: Option<SessionAttempt>,
}

/// The engine facade.
///
/// Holds the collaborators behind their traits. Sessions are owned by the
/// caller and passed in on each submission.
pub struct Engine {
    catalog: Box<dyn CaseSource>,
    scorer: Box<dyn StepScorer>,
    rules: Box<dyn AchievementRules>,
    attempts: Box<dyn AttemptStore>,
    grants: Box<dyn AchievementStore>,
    voice: Option<Box<dyn PatientVoice>>,
    aggregator: SessionAggregator,
}

impl Engine {
    pub fn new(
        catalog: Box<dyn CaseSource>,
        scorer: Box<dyn StepScorer>,
        rules: Box<dyn AchievementRules>,
        attempts: Box<dyn AttemptStore>,
        grants: Box<dyn AchievementStore>,
        progression: ProgressionConfig,
    ) -> Self {
        Self {
            catalog,
            scorer,
            rules,
            attempts,
            grants,
            voice: None,
            aggregator: SessionAggregator::new(progression),
        }
    }

    /// Attach a backend for `ask_patient`.
    pub fn with_patient_voice(mut self, voice: Box<dyn PatientVoice>) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn progression(&self) -> &ProgressionConfig {
        self.aggregator.progression()
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    pub fn list_available_cases(&self) -> Vec<CaseSummary> {
        self.catalog.list_available_cases()
    }

    pub fn get_case(&self, case_id: &CaseId) -> ClinsimResult<&CaseDefinition> {
        self.catalog
            .get_case_by_id(case_id)
            .ok_or_else(|| ClinsimError::CaseNotFound {
                case_id: case_id.to_string(),
            })
    }

    // ── Sessions ─────────────────────────────────────────────────────────────

    /// Open a session on `case_id` at the diagnosis step.
    pub fn start_case(&self, user_id: &UserId, case_id: &CaseId) -> ClinsimResult<CaseSession> {
        let case = self.get_case(case_id)?;
        let session = CaseSession::start(user_id.clone(), case);
        info!(
            session_id = %session.session_id,
            user_id = %user_id,
            case_id = %case_id,
            "case session started"
        );
        Ok(session)
    }

    /// Score `answer` against the session's current step.
    pub fn submit_step_answer(
        &self,
        session: &mut CaseSession,
        answer: &str,
    ) -> ClinsimResult<StepOutcome> {
        let step = session
            .current_step()
            .ok_or_else(|| ClinsimError::SessionCompleted {
                session_id: session.session_id.to_string(),
            })?;
        self.submit_answer_for_step(session, step, answer)
    }

    /// Score `answer` for an explicitly named step.
    ///
    /// # Errors
    ///
    /// `SessionCompleted`, `StepAlreadyScored`, and `StepOutOfOrder` reject
    /// the submission without touching the session. `PersistenceFailure` is
    /// returned when the final step was recorded but the attempt could not be
    /// stored; the session stays completed and `record_attempt` may be retried.
    pub fn submit_answer_for_step(
        &self,
        session: &mut CaseSession,
        step: EvaluationStep,
        answer: &str,
    ) -> ClinsimResult<StepOutcome> {
        // ── Cursor check ─────────────────────────────────────────────────────
        if let Err(e) = session.check_submission(step) {
            warn!(
                session_id = %session.session_id,
                step = %step,
                cursor = %session.cursor(),
                error = %e,
                "submission rejected"
            );
            return Err(e);
        }

        // ── Score ────────────────────────────────────────────────────────────
        let case = self.get_case(&session.case_id)?;
        let evaluation = self.scorer.score(case, step, answer);
        debug!(
            session_id = %session.session_id,
            step = %step,
            score = evaluation.score,
            max_score = evaluation.max_score,
            source = ?evaluation.source,
            "step scored"
        );

        // ── Record ───────────────────────────────────────────────────────────
        let cursor = session.record(evaluation.clone())?;
        let total = session.total();

        // ── Persist on completion ────────────────────────────────────────────
        let attempt = if cursor.is_completed() {
            Some(self.record_attempt(session)?)
        } else {
            None
        };

        Ok(StepOutcome {
            evaluation,
            cursor,
            total,
            attempt,
        })
    }

    /// Persist the attempt for a completed session.
    ///
    /// Safe to call again after a `PersistenceFailure`: stores ignore an
    /// attempt id they already hold.
    pub fn record_attempt(&self, session: &CaseSession) -> ClinsimResult<SessionAttempt> {
        let attempt = session.to_attempt(self.aggregator.progression())?;

        if let Err(e) = self.attempts.append_attempt(&attempt) {
            warn!(
                session_id = %session.session_id,
                error = %e,
                retryable = e.is_retryable(),
                "failed to persist completed attempt"
            );
            return Err(e);
        }

        info!(
            session_id = %session.session_id,
            user_id = %attempt.user_id,
            case_id = %attempt.case_id,
            total_score = attempt.total_score,
            cleared = attempt.cleared,
            "case session completed"
        );
        Ok(attempt)
    }

    // ── Statistics ───────────────────────────────────────────────────────────

    pub fn get_player_stats(&self, user_id: &UserId) -> ClinsimResult<PlayerStats> {
        let history = self.attempts.load_attempts(user_id)?;
        Ok(self.aggregator.player_stats(&history, &self.catalog.case_ids()))
    }

    pub fn get_user_stats(&self, user_id: &UserId) -> ClinsimResult<UserStatsReport> {
        let history = self.attempts.load_attempts(user_id)?;
        debug!(user_id = %user_id, attempts = history.len(), "aggregating user stats");
        Ok(self
            .aggregator
            .user_report(user_id, &history, &self.catalog.case_ids()))
    }

    // ── Achievements ─────────────────────────────────────────────────────────

    /// Evaluate the achievement table and grant anything newly earned.
    ///
    /// `unlocked` is the union of what the current stats satisfy and what was
    /// previously granted, so a badge once earned is never taken away. Grants
    /// are idempotent; a failure part-way can be retried.
    pub fn get_unlocked_achievements(&self, user_id: &UserId) -> ClinsimResult<AchievementReport> {
        let stats = self.get_player_stats(user_id)?;
        let persisted = self.grants.load_achievement_records(user_id)?;

        for id in &persisted {
            if !self.rules.all().iter().any(|a| &a.id == id) {
                warn!(user_id = %user_id, achievement_id = %id, "granted achievement is no longer defined");
            }
        }

        let computed: BTreeSet<AchievementId> = self
            .rules
            .unlocked(&stats)
            .into_iter()
            .map(|a| a.id)
            .collect();

        let mut unlocked: Vec<Achievement> = Vec::new();
        let mut newly_unlocked: Vec<Achievement> = Vec::new();
        let mut locked: Vec<Achievement> = Vec::new();

        for achievement in self.rules.all() {
            let was_granted = persisted.contains(&achievement.id);
            if computed.contains(&achievement.id) && !was_granted {
                self.grants.grant_achievement(user_id, &achievement.id)?;
                info!(user_id = %user_id, achievement_id = %achievement.id, "achievement unlocked");
                newly_unlocked.push(achievement.clone());
                unlocked.push(achievement.clone());
            } else if was_granted || computed.contains(&achievement.id) {
                unlocked.push(achievement.clone());
            } else {
                locked.push(achievement.clone());
            }
        }

        Ok(AchievementReport {
            unlocked,
            newly_unlocked,
            locked,
            stats,
        })
    }

    // ── Patient conversation ─────────────────────────────────────────────────

    /// Ask the simulated patient of the session's case.
    ///
    /// Returns `EvaluatorUnavailable` when no backend is attached.
    pub fn ask_patient(&self, session: &CaseSession, transcript: &[ChatTurn]) -> ClinsimResult<String> {
        let voice = self.voice.as_ref().ok_or_else(|| ClinsimError::EvaluatorUnavailable {
            reason: "no patient voice backend is configured".to_string(),
        })?;

        let case = self.get_case(&session.case_id)?;
        let shaped = normalize_transcript(transcript)?;
        let persona = patient_persona_prompt(case);

        debug!(session_id = %session.session_id, turns = shaped.len(), "asking simulated patient");
        voice.reply(&persona, &shaped)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
