//! Scoring through an external free-text evaluator.
//!
//! `AssistedScorer` implements `StepScorer` by prompting a
//! `FreeTextEvaluator` and validating its reply in two phases:
//!
//! 1. **Extraction**: the outermost `{…}` block is cut out of the raw text
//!    and parsed as JSON.
//! 2. **Structural**: the JSON is validated against `reply_schema()` using
//!    the `jsonschema` crate.
//!
//! The score is then clamped into `[0, W]`. Any failure along the way,
//! including the evaluator itself failing, degrades to a zero-score fallback
//! evaluation; a session never stalls on a bad reply.

use serde_json::{json, Value};
use tracing::{debug, warn};

use clinsim_contracts::{
    case::CaseDefinition,
    error::{ClinsimError, ClinsimResult},
    evaluation::{CreditTier, CriterionFeedback, EvaluationSource, StepEvaluation},
    step::EvaluationStep,
};
use clinsim_core::traits::{FreeTextEvaluator, StepScorer};

use crate::prompt::build_step_prompt;

/// Neutral message shown when an evaluation had to fall back to zero.
pub const FALLBACK_MESSAGE: &str = "The answer could not be evaluated automatically; scored as 0.";

/// The JSON Schema every evaluator reply must satisfy.
pub fn reply_schema() -> Value {
    json!({
        "type": "object",
        "required": ["isCorrect", "score", "feedback"],
        "properties": {
            "isCorrect": { "type": "boolean" },
            "score": { "type": "number" },
            "feedback": { "type": "string" },
            "explanation": { "type": "string" },
            "clinicalReferences": {
                "type": "array",
                "items": { "type": "string" }
            },
            "learnMore": { "type": "string" }
        }
    })
}

/// A `StepScorer` backed by an external evaluator.
pub struct AssistedScorer {
    evaluator: Box<dyn FreeTextEvaluator>,
    schema: Value,
}

impl AssistedScorer {
    pub fn new(evaluator: Box<dyn FreeTextEvaluator>) -> Self {
        Self {
            evaluator,
            schema: reply_schema(),
        }
    }

    /// Validate a raw evaluator reply and turn it into an evaluation.
    ///
    /// Returns `ClinsimError::EvaluatorUnavailable` when no JSON object can be
    /// extracted or the object violates the reply schema.
    pub fn parse_reply(
        &self,
        reply: &str,
        step: EvaluationStep,
        max_score: u32,
    ) -> ClinsimResult<StepEvaluation> {
        // ── Phase 1: Extraction ──────────────────────────────────────────────
        let block = outermost_object(reply).ok_or_else(|| ClinsimError::EvaluatorUnavailable {
            reason: "reply contains no JSON object".to_string(),
        })?;
        let payload: Value =
            serde_json::from_str(block).map_err(|e| ClinsimError::EvaluatorUnavailable {
                reason: format!("reply is not valid JSON: {}", e),
            })?;

        // ── Phase 2: Structural validation ───────────────────────────────────
        let validator = jsonschema::validator_for(&self.schema).map_err(|e| {
            ClinsimError::ConfigError {
                reason: format!("invalid reply schema: {}", e),
            }
        })?;
        let violations: Vec<String> = validator
            .iter_errors(&payload)
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();
        if !violations.is_empty() {
            return Err(ClinsimError::EvaluatorUnavailable {
                reason: format!("reply failed schema validation: {}", violations.join("; ")),
            });
        }

        // Fields below are guaranteed by the schema.
        let raw_score = payload["score"].as_f64().unwrap_or(0.0);
        let score = clamp_score(raw_score, max_score);
        let claimed_correct = payload["isCorrect"].as_bool().unwrap_or(false);
        let feedback = payload["feedback"].as_str().unwrap_or_default().to_string();
        let explanation = payload["explanation"].as_str().map(str::to_string);
        let learn_more = payload["learnMore"].as_str().map(str::to_string);
        let references: Vec<String> = payload["clinicalReferences"]
            .as_array()
            .map(|refs| refs.iter().filter_map(|r| r.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let tier = if score >= max_score {
            CreditTier::Full
        } else if score > 0 {
            CreditTier::Partial
        } else {
            CreditTier::None
        };
        let is_correct = tier == CreditTier::Full;
        if claimed_correct != is_correct {
            debug!(
                step = %step,
                score,
                max_score,
                claimed_correct,
                "evaluator correctness flag disagrees with its score"
            );
        }

        let areas_to_improve = if tier == CreditTier::Full {
            Vec::new()
        } else {
            vec![format!("{}: {}", step.label(), feedback)]
        };

        Ok(StepEvaluation {
            step,
            score,
            max_score,
            tier,
            is_correct,
            matched: Vec::new(),
            missing: Vec::new(),
            feedback: vec![CriterionFeedback::new(step.label(), feedback)],
            areas_to_improve,
            explanation,
            references,
            learn_more,
            reasoning_bonus: 0,
            source: EvaluationSource::External,
        })
    }

    fn try_score(
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
        let prompt = build_step_prompt(case, step, answer);
        let reply = self.evaluator.evaluate(&prompt)?;
        debug!(case_id = %case.id, step = %step, reply_len = reply.len(), "evaluator replied");
        self.parse_reply(&reply, step, case.weight_for(step))
    }
}

impl StepScorer for AssistedScorer {
    fn score(&self, case: &CaseDefinition, step: EvaluationStep, answer: &str) -> StepEvaluation {
        match self.try_score(case, step, answer) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(case_id = %case.id, step = %step, error = %e, "external evaluation fell back to zero");
                StepEvaluation::fallback(step, case.weight_for(step), FALLBACK_MESSAGE)
            }
        }
    }
}

/// The slice from the first `{` to the last `}`, if both exist in order.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Clamp an evaluator score into `[0, max_score]`, rounding down.
fn clamp_score(raw: f64, max_score: u32) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let floored = raw.floor();
    if floored >= max_score as f64 {
        max_score
    } else {
        floored as u32
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use clinsim_contracts::{
        error::{ClinsimError, ClinsimResult},
        evaluation::{CreditTier, EvaluationSource},
        step::EvaluationStep,
    };
    use clinsim_core::traits::{FreeTextEvaluator, StepScorer};

    use crate::testing::chest_pain_case;

    use super::{clamp_score, outermost_object, AssistedScorer, FALLBACK_MESSAGE};

    /// Replays a canned reply and records the prompts it was given.
    struct CannedEvaluator {
        reply: ClinsimResult<String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl CannedEvaluator {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Arc::new(Mutex::new(vec![])),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(ClinsimError::EvaluatorUnavailable {
                    reason: "timeout".to_string(),
                }),
                prompts: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    impl FreeTextEvaluator for CannedEvaluator {
        fn evaluate(&self, prompt: &str) -> ClinsimResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(ClinsimError::EvaluatorUnavailable { reason: e.to_string() }),
            }
        }
    }

    #[test]
    fn valid_reply_wrapped_in_prose_is_accepted() {
        let reply = r#"Aquí está la evaluación:
```json
{"isCorrect": true, "score": 40, "feedback": "Diagnóstico correcto",
 "explanation": "IAM con elevación del ST", "clinicalReferences": ["ESC 2023"],
 "learnMore": "Código infarto"}
```"#;
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(reply)));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Diagnosis, "IAM");

        assert_eq!(eval.score, 40);
        assert!(eval.is_correct);
        assert_eq!(eval.tier, CreditTier::Full);
        assert_eq!(eval.source, EvaluationSource::External);
        assert_eq!(eval.references, vec!["ESC 2023".to_string()]);
        assert_eq!(eval.learn_more.as_deref(), Some("Código infarto"));
    }

    #[test]
    fn score_above_weight_is_clamped() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(
            r#"{"isCorrect": true, "score": 90, "feedback": "ok"}"#,
        )));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Tests, "ecg");
        assert_eq!(eval.score, 15);
        assert_eq!(eval.max_score, 15);
    }

    #[test]
    fn fractional_and_negative_scores_are_normalized() {
        assert_eq!(clamp_score(7.9, 15), 7);
        assert_eq!(clamp_score(-3.0, 15), 0);
        assert_eq!(clamp_score(f64::NAN, 15), 0);
        assert_eq!(clamp_score(15.0, 15), 15);
    }

    #[test]
    fn correctness_follows_the_clamped_score() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(
            r#"{"isCorrect": true, "score": 0, "feedback": "x"}"#,
        )));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Diagnosis, "IAM");
        assert_eq!(eval.score, 0);
        assert_eq!(eval.tier, CreditTier::None);
        assert!(!eval.is_correct);
        assert_eq!(eval.areas_to_improve, vec!["Diagnosis: x".to_string()]);

        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(
            r#"{"isCorrect": false, "score": 40, "feedback": "ok"}"#,
        )));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Diagnosis, "IAM");
        assert!(eval.is_correct);
        assert!(eval.areas_to_improve.is_empty());
    }

    #[test]
    fn partial_external_score_lists_area_to_improve() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(
            r#"{"isCorrect": false, "score": 5.5, "feedback": "Faltan troponinas"}"#,
        )));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Tests, "ecg");
        assert_eq!(eval.score, 5);
        assert_eq!(eval.tier, CreditTier::Partial);
        assert_eq!(eval.areas_to_improve, vec!["Diagnostic tests: Faltan troponinas".to_string()]);
    }

    #[test]
    fn missing_required_field_falls_back_to_zero() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok(
            r#"{"isCorrect": true, "feedback": "sin puntuación"}"#,
        )));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Diagnosis, "IAM");
        assert_eq!(eval.score, 0);
        assert_eq!(eval.source, EvaluationSource::Fallback);
        assert_eq!(eval.explanation.as_deref(), Some(FALLBACK_MESSAGE));
    }

    #[test]
    fn wrong_field_type_is_rejected_by_schema() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok("")));
        let err = scorer
            .parse_reply(r#"{"isCorrect": "yes", "score": "40", "feedback": 1}"#, EvaluationStep::Diagnosis, 40)
            .unwrap_err();
        assert!(matches!(err, ClinsimError::EvaluatorUnavailable { .. }));
        assert!(err.to_string().contains("schema"));
    }

    #[test]
    fn prose_without_json_falls_back() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::ok("Lo siento, no puedo evaluar.")));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Followup, "control");
        assert_eq!(eval.score, 0);
        assert_eq!(eval.source, EvaluationSource::Fallback);
    }

    #[test]
    fn evaluator_failure_falls_back() {
        let scorer = AssistedScorer::new(Box::new(CannedEvaluator::failing()));
        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Treatment, "aspirina");
        assert_eq!(eval.score, 0);
        assert_eq!(eval.max_score, 15);
    }

    #[test]
    fn blank_answer_never_reaches_evaluator() {
        let evaluator = CannedEvaluator::ok(r#"{"isCorrect": true, "score": 40, "feedback": "ok"}"#);
        let prompts = evaluator.prompts.clone();
        let scorer = AssistedScorer::new(Box::new(evaluator));

        let eval = scorer.score(&chest_pain_case(), EvaluationStep::Diagnosis, "  ");
        assert_eq!(eval.score, 0);
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn outermost_object_spans_first_to_last_brace() {
        assert_eq!(outermost_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(outermost_object("} nothing {"), None);
        assert_eq!(outermost_object("no braces"), None);
    }
}
