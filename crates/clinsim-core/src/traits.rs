//! Collaborator seams for the clinical simulation engine.
//!
//! The engine owns the step state machine and the aggregation logic. Every
//! other concern sits behind one of these traits:
//!
//! - `CaseSource`       : read-only case catalog
//! - `StepScorer`       : turns one answer into a `StepEvaluation`
//! - `FreeTextEvaluator`: optional external evaluator for narrative answers
//! - `AttemptStore`     : append-only attempt history
//! - `AchievementStore` : persisted badge grants
//! - `AchievementRules` : the badge table and its predicates
//! - `PatientVoice`     : optional simulated-patient conversation backend

use std::collections::BTreeSet;

use clinsim_contracts::{
    achievement::{Achievement, AchievementId},
    case::{CaseDefinition, CaseId, CaseSummary},
    chat::ChatTurn,
    error::ClinsimResult,
    evaluation::StepEvaluation,
    session::{SessionAttempt, UserId},
    stats::PlayerStats,
    step::EvaluationStep,
};

/// The case catalog. Immutable once constructed.
pub trait CaseSource: Send + Sync {
    /// Look up one case. `None` when the id is unknown.
    fn get_case_by_id(&self, case_id: &CaseId) -> Option<&CaseDefinition>;

    /// Summaries of every case, in catalog order.
    fn list_available_cases(&self) -> Vec<CaseSummary>;

    /// Every case id, in catalog order.
    fn case_ids(&self) -> Vec<CaseId>;
}

/// Scores one answer for one step of one case.
///
/// Scoring is infallible from the engine's perspective: unusable answers and
/// evaluator failures come back as a zero-score fallback evaluation so the
/// session keeps progressing.
pub trait StepScorer: Send + Sync {
    fn score(&self, case: &CaseDefinition, step: EvaluationStep, answer: &str) -> StepEvaluation;
}

/// An external evaluator for free-text answers.
///
/// The reply is raw text. Callers are responsible for extracting and
/// validating any structured payload it contains.
pub trait FreeTextEvaluator: Send + Sync {
    fn evaluate(&self, prompt: &str) -> ClinsimResult<String>;
}

/// The attempt history.
///
/// Implementations must treat this as append-only. Appending an attempt whose
/// id is already stored is a no-op, so retries after a partial failure are safe.
pub trait AttemptStore: Send + Sync {
    fn load_attempts(&self, user_id: &UserId) -> ClinsimResult<Vec<SessionAttempt>>;

    fn append_attempt(&self, attempt: &SessionAttempt) -> ClinsimResult<()>;
}

/// Persisted achievement grants.
pub trait AchievementStore: Send + Sync {
    fn load_achievement_records(&self, user_id: &UserId) -> ClinsimResult<BTreeSet<AchievementId>>;

    /// Record a grant. Granting an already-granted badge is a no-op.
    fn grant_achievement(&self, user_id: &UserId, achievement_id: &AchievementId) -> ClinsimResult<()>;
}

/// The achievement table and its unlock predicates.
pub trait AchievementRules: Send + Sync {
    /// Every defined achievement, in table order.
    fn all(&self) -> &[Achievement];

    /// True when `stats` satisfies the achievement's condition.
    fn is_unlocked(&self, achievement: &Achievement, stats: &PlayerStats) -> bool;

    fn unlocked(&self, stats: &PlayerStats) -> Vec<Achievement> {
        self.all()
            .iter()
            .filter(|a| self.is_unlocked(a, stats))
            .cloned()
            .collect()
    }

    fn locked(&self, stats: &PlayerStats) -> Vec<Achievement> {
        self.all()
            .iter()
            .filter(|a| !self.is_unlocked(a, stats))
            .cloned()
            .collect()
    }
}

/// Backend for the simulated-patient conversation.
///
/// `persona` is the system prompt describing the patient; `transcript` holds
/// the conversation so far, ending with the doctor's latest question.
pub trait PatientVoice: Send + Sync {
    fn reply(&self, persona: &str, transcript: &[ChatTurn]) -> ClinsimResult<String>;
}
