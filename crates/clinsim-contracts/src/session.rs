//! Persisted session attempts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{case::CaseId, step::EvaluationStep};

/// Stable identifier for a user, owned by the external account system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Unique identifier of one attempt. Equal to the id of the session that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's full pass through a case, as handed to the store.
///
/// Written once, after the last step is scored. Records are never modified;
/// a repeated append of the same `attempt_id` is a no-op in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAttempt {
    pub attempt_id: AttemptId,
    pub user_id: UserId,
    pub case_id: CaseId,
    pub case_name: String,
    pub step_scores: BTreeMap<EvaluationStep, u32>,
    /// Sum of `step_scores`. 0..=100.
    pub total_score: u32,
    /// Every step was scored.
    pub completed: bool,
    /// `total_score` reached the progression threshold.
    pub cleared: bool,
    /// Sum of reasoning bonuses. Not part of `total_score`.
    pub reasoning_bonus: u32,
    pub created_at: DateTime<Utc>,
}

impl SessionAttempt {
    pub fn step_score(&self, step: EvaluationStep) -> u32 {
        self.step_scores.get(&step).copied().unwrap_or(0)
    }

    /// Recompute the total from the recorded steps.
    pub fn sum_of_steps(&self) -> u32 {
        self.step_scores.values().sum()
    }
}
