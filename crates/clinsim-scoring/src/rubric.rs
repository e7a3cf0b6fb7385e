//! Deterministic keyword compliance scorer.
//!
//! `ComplianceScorer` implements `StepScorer` from `clinsim-core`. Scoring is
//! a pure function of the case, the step, and the answer text:
//!
//! 1. Lower-case the answer.
//! 2. Count which of the step's expected phrases appear as substrings. Each
//!    phrase counts at most once.
//! 3. Map the match count to a credit tier for the step type:
//!    - diagnosis, differential: any match → full
//!    - tests, treatment: `matches * 100 >= full_credit_percent * |K|` → full,
//!      any match → partial
//!    - followup: `followup_full_matches` or more → full, one → partial
//! 4. Full tier awards the step weight, partial awards
//!    `weight / partial_credit_divisor`, none awards 0.
//!
//! The clinical-reasoning bonus is reported separately and never added to
//! the step score.

use tracing::{debug, warn};

use clinsim_contracts::{
    case::CaseDefinition,
    error::{ClinsimError, ClinsimResult},
    evaluation::{CreditTier, CriterionFeedback, EvaluationSource, StepEvaluation},
    rubric::RubricConfig,
    step::EvaluationStep,
};
use clinsim_core::traits::StepScorer;

/// Criterion name used for the reasoning bonus in feedback lists.
pub const REASONING_CRITERION: &str = "Clinical reasoning";

/// The keyword rubric scorer.
#[derive(Debug, Clone, Default)]
pub struct ComplianceScorer {
    config: RubricConfig,
}

impl ComplianceScorer {
    pub fn new(config: RubricConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RubricConfig {
        &self.config
    }

    /// Score `answer` for `step`.
    ///
    /// Returns `ClinsimError::InvalidAnswer` for an empty or whitespace-only
    /// answer. The `StepScorer` impl turns that into a zero-score fallback.
    pub fn evaluate(
        &self,
        case: &CaseDefinition,
        step: EvaluationStep,
        answer: &str,
    ) -> ClinsimResult<StepEvaluation> {
        if answer.trim().is_empty() {
            return Err(ClinsimError::InvalidAnswer {
                reason: format!("empty answer for step '{}'", step),
            });
        }

        let normalized = answer.to_lowercase();
        let keywords = case.keywords_for(step);
        let weight = case.weight_for(step);

        let (matched, missing): (Vec<String>, Vec<String>) = keywords
            .iter()
            .cloned()
            .partition(|k| normalized.contains(k.as_str()));

        let tier = self.tier_for(step, matched.len(), keywords.len());
        let score = match tier {
            CreditTier::Full => weight,
            CreditTier::Partial => self.config.partial_credit(weight),
            CreditTier::None => 0,
        };

        let mut feedback = vec![CriterionFeedback::new(
            step.label(),
            tier_message(tier, &matched, &missing, keywords.len()),
        )];
        let mut areas_to_improve = Vec::new();
        if tier != CreditTier::Full {
            areas_to_improve.push(format!(
                "{}: include {}",
                step.label(),
                missing.join(", ")
            ));
        }

        let reasoning_bonus = self.reasoning_bonus(answer);
        if reasoning_bonus > 0 {
            feedback.push(CriterionFeedback::new(
                REASONING_CRITERION,
                format!("documented reasoning (+{} bonus)", reasoning_bonus),
            ));
        }

        debug!(
            case_id = %case.id,
            step = %step,
            matched = matched.len(),
            expected = keywords.len(),
            score,
            "rubric evaluation"
        );

        Ok(StepEvaluation {
            step,
            score,
            max_score: weight,
            tier,
            is_correct: tier == CreditTier::Full,
            matched,
            missing,
            feedback,
            areas_to_improve,
            explanation: None,
            references: Vec::new(),
            learn_more: None,
            reasoning_bonus,
            source: EvaluationSource::Rubric,
        })
    }

    /// The bonus for documented reasoning, or 0.
    ///
    /// Awarded when the answer is strictly longer than `reasoning_min_chars`
    /// characters and contains one of the reasoning markers.
    pub fn reasoning_bonus(&self, answer: &str) -> u32 {
        if answer.chars().count() <= self.config.reasoning_min_chars {
            return 0;
        }
        let normalized = answer.to_lowercase();
        if self
            .config
            .reasoning_markers
            .iter()
            .any(|m| normalized.contains(m.as_str()))
        {
            self.config.reasoning_bonus
        } else {
            0
        }
    }

    fn tier_for(&self, step: EvaluationStep, matches: usize, expected: usize) -> CreditTier {
        if matches == 0 {
            return CreditTier::None;
        }
        match step {
            EvaluationStep::Diagnosis | EvaluationStep::Differential => CreditTier::Full,
            EvaluationStep::Tests | EvaluationStep::Treatment => {
                let percent = self.config.full_credit_percent as usize;
                if matches * 100 >= percent * expected {
                    CreditTier::Full
                } else {
                    CreditTier::Partial
                }
            }
            EvaluationStep::Followup => {
                if matches >= self.config.followup_full_matches as usize {
                    CreditTier::Full
                } else {
                    CreditTier::Partial
                }
            }
        }
    }
}

fn tier_message(tier: CreditTier, matched: &[String], missing: &[String], expected: usize) -> String {
    match tier {
        CreditTier::Full => format!(
            "✓ full credit ({}/{}): {}",
            matched.len(),
            expected,
            matched.join(", ")
        ),
        CreditTier::Partial => format!(
            "~ partial credit ({}/{}); missing: {}",
            matched.len(),
            expected,
            missing.join(", ")
        ),
        CreditTier::None => format!("✗ no expected phrase found; expected: {}", missing.join(", ")),
    }
}

impl StepScorer for ComplianceScorer {
    fn score(&self, case: &CaseDefinition, step: EvaluationStep, answer: &str) -> StepEvaluation {
        match self.evaluate(case, step, answer) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(case_id = %case.id, step = %step, error = %e, "answer scored as zero");
                StepEvaluation::fallback(step, case.weight_for(step), e.to_string())
            }
        }
    }
}
