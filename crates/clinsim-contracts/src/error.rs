//! Error types for the clinical simulation engine.
//!
//! All fallible operations return `ClinsimResult<T>`. Variants carry the id
//! of the entity involved so callers can surface them without extra lookups.

use thiserror::Error;

use crate::step::EvaluationStep;

/// The unified error type for the engine and its collaborators.
#[derive(Debug, Error)]
pub enum ClinsimError {
    /// No case with this id exists in the active catalog.
    #[error("case '{case_id}' not found")]
    CaseNotFound { case_id: String },

    /// The step already holds a score in this session.
    ///
    /// Indicates a client bug or a replayed request. Session state is unchanged.
    #[error("step '{step}' has already been scored in this session")]
    StepAlreadyScored { step: EvaluationStep },

    /// The submission targets a step that is not the session's current step.
    #[error("step '{submitted}' submitted while the session expects '{expected}'")]
    StepOutOfOrder {
        expected: EvaluationStep,
        submitted: EvaluationStep,
    },

    /// Every step has been scored; the session accepts no more answers.
    #[error("session '{session_id}' is already completed")]
    SessionCompleted { session_id: String },

    /// The session still has unscored steps, so no attempt can be recorded.
    #[error("session '{session_id}' is not completed; step '{pending}' is still pending")]
    SessionIncomplete {
        session_id: String,
        pending: EvaluationStep,
    },

    /// The answer is empty or whitespace only.
    ///
    /// Scorers convert this into a zero score; it never aborts a session.
    #[error("invalid answer: {reason}")]
    InvalidAnswer { reason: String },

    /// The external free-text evaluator failed or produced unusable output.
    ///
    /// Scorers convert this into a zero score with neutral feedback.
    #[error("free-text evaluator unavailable: {reason}")]
    EvaluatorUnavailable { reason: String },

    /// The persistence collaborator could not read or write a record.
    #[error("persistence failure: {reason}")]
    PersistenceFailure { reason: String },

    /// A configuration document is missing, malformed, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The achievement id is not part of the active achievement table.
    #[error("achievement '{achievement_id}' is not defined")]
    UnknownAchievement { achievement_id: String },
}

impl ClinsimError {
    /// True when repeating the same operation may succeed.
    ///
    /// Only persistence failures qualify; every other kind is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClinsimError::PersistenceFailure { .. })
    }
}

/// Convenience alias used throughout the clinsim crates.
pub type ClinsimResult<T> = Result<T, ClinsimError>;
