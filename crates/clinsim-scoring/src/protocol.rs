//! Whole-protocol evaluation of a single free-text response.
//!
//! Where the step flow scores one answer per step, `evaluate_protocol`
//! scores one response against all five criteria at once, adds the reasoning
//! bonus, and attaches the case's guideline bundle and education points.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use clinsim_contracts::{
    case::{CaseDefinition, CaseId, Guidelines},
    evaluation::{CriterionFeedback, StepEvaluation},
    step::EvaluationStep,
};
use clinsim_core::traits::StepScorer;

use crate::rubric::{ComplianceScorer, REASONING_CRITERION};

/// Performance bands on the 0–100 rubric total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Acceptable,
    Developing,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            PerformanceLevel::Excellent
        } else if score >= 80 {
            PerformanceLevel::Good
        } else if score >= 70 {
            PerformanceLevel::Acceptable
        } else if score >= 60 {
            PerformanceLevel::Developing
        } else {
            PerformanceLevel::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Acceptable => "Acceptable",
            PerformanceLevel::Developing => "Developing",
            PerformanceLevel::NeedsImprovement => "Needs improvement",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => {
                "Complete management according to clinical guidelines; ready for independent practice."
            }
            PerformanceLevel::Good => "Adequate management with some aspects to improve.",
            PerformanceLevel::Acceptable => "Meets the minimum but needs reinforcement.",
            PerformanceLevel::Developing => "Significant gaps in management.",
            PerformanceLevel::NeedsImprovement => {
                "Insufficient management; does not meet minimum standards."
            }
        }
    }

    pub fn recommended_action(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Move on to a more complex case.",
            PerformanceLevel::Good => "Review the weak points before the next case.",
            PerformanceLevel::Acceptable => "Review the protocol before repeating this case.",
            PerformanceLevel::Developing => "Repeat the case until reaching 80+ points.",
            PerformanceLevel::NeedsImprovement => {
                "Full protocol review; supervised practice recommended."
            }
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The result of `evaluate_protocol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEvaluation {
    pub case_id: CaseId,
    /// One evaluation per step, in step order.
    pub criteria: Vec<StepEvaluation>,
    pub scores: BTreeMap<EvaluationStep, u32>,
    /// Sum of the five criterion scores, at most 100.
    pub rubric_total: u32,
    pub reasoning_bonus: u32,
    pub reasoning_feedback: CriterionFeedback,
    /// `rubric_total + reasoning_bonus`.
    pub total_score: u32,
    pub areas_to_improve: Vec<String>,
    pub education_notes: Vec<String>,
    pub guidelines: Guidelines,
    /// Banded on `rubric_total`.
    pub performance: PerformanceLevel,
}

impl ComplianceScorer {
    /// Score `response` against every criterion of `case` at once.
    ///
    /// A blank response yields zero for every criterion rather than an error.
    pub fn evaluate_protocol(&self, case: &CaseDefinition, response: &str) -> ProtocolEvaluation {
        let criteria: Vec<StepEvaluation> = EvaluationStep::ORDER
            .iter()
            .map(|step| {
                let mut evaluation = self.score(case, *step, response);
                // The bonus is counted once for the whole response below.
                evaluation.reasoning_bonus = 0;
                evaluation
                    .feedback
                    .retain(|f| f.criterion != REASONING_CRITERION);
                evaluation
            })
            .collect();

        let scores: BTreeMap<EvaluationStep, u32> =
            criteria.iter().map(|e| (e.step, e.score)).collect();
        let rubric_total: u32 = scores.values().sum();
        let areas_to_improve: Vec<String> = criteria
            .iter()
            .flat_map(|e| e.areas_to_improve.iter().cloned())
            .collect();

        let reasoning_bonus = self.reasoning_bonus(response);
        let reasoning_feedback = if reasoning_bonus > 0 {
            CriterionFeedback::new(REASONING_CRITERION, "✓ clinical reasoning documented")
        } else {
            CriterionFeedback::new(REASONING_CRITERION, "~ justify the clinical reasoning further")
        };

        let performance = PerformanceLevel::from_score(rubric_total);
        debug!(
            case_id = %case.id,
            rubric_total,
            reasoning_bonus,
            performance = %performance,
            "protocol evaluation"
        );

        ProtocolEvaluation {
            case_id: case.id.clone(),
            criteria,
            scores,
            rubric_total,
            reasoning_bonus,
            reasoning_feedback,
            total_score: rubric_total + reasoning_bonus,
            areas_to_improve,
            education_notes: case.education_points.clone(),
            guidelines: case.guidelines.clone(),
            performance,
        }
    }
}
