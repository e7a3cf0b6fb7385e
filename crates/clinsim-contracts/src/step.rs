//! The fixed rubric step order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five rubric categories, in the order a session visits them.
///
/// The derived `Ord` follows declaration order, which is the traversal order,
/// so a `BTreeMap<EvaluationStep, _>` iterates steps the way a session does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStep {
    Diagnosis,
    Differential,
    Tests,
    Treatment,
    Followup,
}

impl EvaluationStep {
    /// All steps in traversal order.
    pub const ORDER: [EvaluationStep; 5] = [
        EvaluationStep::Diagnosis,
        EvaluationStep::Differential,
        EvaluationStep::Tests,
        EvaluationStep::Treatment,
        EvaluationStep::Followup,
    ];

    /// The step after this one, or `None` after `Followup`.
    pub fn next(self) -> Option<EvaluationStep> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Zero-based position in `ORDER`.
    pub fn index(self) -> usize {
        match self {
            EvaluationStep::Diagnosis => 0,
            EvaluationStep::Differential => 1,
            EvaluationStep::Tests => 2,
            EvaluationStep::Treatment => 3,
            EvaluationStep::Followup => 4,
        }
    }

    /// Wire name, as used in serialized records and evaluator prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationStep::Diagnosis => "diagnosis",
            EvaluationStep::Differential => "differential",
            EvaluationStep::Tests => "tests",
            EvaluationStep::Treatment => "treatment",
            EvaluationStep::Followup => "followup",
        }
    }

    /// Human-readable criterion name used in feedback.
    pub fn label(self) -> &'static str {
        match self {
            EvaluationStep::Diagnosis => "Diagnosis",
            EvaluationStep::Differential => "Differential diagnosis",
            EvaluationStep::Tests => "Diagnostic tests",
            EvaluationStep::Treatment => "Treatment plan",
            EvaluationStep::Followup => "Follow-up plan",
        }
    }

    /// The question put to the trainee for this step.
    pub fn question(self) -> &'static str {
        match self {
            EvaluationStep::Diagnosis => "What is your main diagnosis for this patient?",
            EvaluationStep::Differential => "Which differential diagnoses would you consider?",
            EvaluationStep::Tests => "Which diagnostic tests would you order?",
            EvaluationStep::Treatment => "What is your treatment plan?",
            EvaluationStep::Followup => "How would you follow up with this patient?",
        }
    }
}

impl fmt::Display for EvaluationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .copied()
            .find(|step| step.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown evaluation step '{s}'"))
    }
}

/// Where a session stands: waiting on a step, or past the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "step")]
pub enum StepCursor {
    Pending(EvaluationStep),
    Completed,
}

impl StepCursor {
    /// The cursor a fresh session starts at.
    pub fn start() -> Self {
        StepCursor::Pending(EvaluationStep::Diagnosis)
    }

    /// Advance past `step`. Linear and irreversible.
    pub fn after(step: EvaluationStep) -> Self {
        match step.next() {
            Some(next) => StepCursor::Pending(next),
            None => StepCursor::Completed,
        }
    }

    pub fn pending_step(self) -> Option<EvaluationStep> {
        match self {
            StepCursor::Pending(step) => Some(step),
            StepCursor::Completed => None,
        }
    }

    pub fn is_completed(self) -> bool {
        self == StepCursor::Completed
    }
}

impl fmt::Display for StepCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepCursor::Pending(step) => write!(f, "{step}"),
            StepCursor::Completed => f.write_str("completed"),
        }
    }
}
