//! Per-step evaluation records.
//!
//! A `StepEvaluation` is what a scorer hands back for one answer. It is the
//! same shape whether the deterministic rubric produced it, an external
//! free-text evaluator did, or the zero-score fallback stood in for either.

use serde::{Deserialize, Serialize};

use crate::step::EvaluationStep;

/// The three credit bands a step score can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditTier {
    None,
    Partial,
    Full,
}

/// Which path produced an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationSource {
    /// Deterministic keyword rubric.
    Rubric,
    /// A validated reply from the external free-text evaluator.
    External,
    /// Zero-score stand-in after an unusable answer or evaluator reply.
    Fallback,
}

/// Feedback for one named criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionFeedback {
    pub criterion: String,
    pub message: String,
}

impl CriterionFeedback {
    pub fn new(criterion: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            criterion: criterion.into(),
            message: message.into(),
        }
    }
}

/// The scored result of one answer for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvaluation {
    pub step: EvaluationStep,
    /// Always within `0..=max_score`.
    pub score: u32,
    /// The case's weight for `step`.
    pub max_score: u32,
    pub tier: CreditTier,
    /// True only at the full-credit tier.
    pub is_correct: bool,
    /// Expected phrases found in the answer.
    pub matched: Vec<String>,
    /// Expected phrases not found in the answer.
    pub missing: Vec<String>,
    pub feedback: Vec<CriterionFeedback>,
    /// One entry per criterion scored below full credit.
    pub areas_to_improve: Vec<String>,
    pub explanation: Option<String>,
    pub references: Vec<String>,
    pub learn_more: Option<String>,
    /// Clinical-reasoning bonus. Outside the 100-point rubric.
    pub reasoning_bonus: u32,
    pub source: EvaluationSource,
}

impl StepEvaluation {
    /// A zero-score evaluation carrying a single explanatory message.
    ///
    /// Used whenever an answer or an evaluator reply cannot be scored, so the
    /// session keeps progressing.
    pub fn fallback(step: EvaluationStep, max_score: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            step,
            score: 0,
            max_score,
            tier: CreditTier::None,
            is_correct: false,
            matched: Vec::new(),
            missing: Vec::new(),
            feedback: vec![CriterionFeedback::new(step.label(), message.clone())],
            areas_to_improve: vec![format!("{}: answer could not be evaluated", step.label())],
            explanation: Some(message),
            references: Vec::new(),
            learn_more: None,
            reasoning_bonus: 0,
            source: EvaluationSource::Fallback,
        }
    }

    /// Feedback lines joined for single-line display.
    pub fn feedback_summary(&self) -> String {
        self.feedback
            .iter()
            .map(|f| format!("{}: {}", f.criterion, f.message))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
