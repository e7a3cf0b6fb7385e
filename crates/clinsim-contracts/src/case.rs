//! Case definitions: the immutable rubric and display data for one scenario.
//!
//! Only the keyword sets and weights take part in scoring. Everything else
//! (patient profile, vitals, history, guidelines, education points) is shown
//! to the trainee or used as supplementary feedback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ClinsimError, ClinsimResult},
    step::EvaluationStep,
};

/// Stable identifier for a case, e.g. `CaseId("hta-primary-001")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CaseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlcoholUse {
    None,
    Moderate,
    Heavy,
}

/// Display-only patient profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub age: u8,
    pub sex: Sex,
    pub occupation: String,
    pub past_medical_history: Vec<String>,
    pub current_medications: Vec<String>,
    pub allergies: Vec<String>,
    pub family_history: Vec<String>,
    pub smoking: SmokingStatus,
    pub pack_years: Option<u16>,
    pub alcohol: AlcoholUse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Systolic/diastolic, e.g. "152/96".
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    /// Percent.
    pub oxygen_saturation: u8,
}

/// Protocol references attached to a case. Used for supplementary feedback only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidelines {
    /// e.g. "ESC/EAS 2021, AAFP, GPC Española 2022".
    pub source: String,
    /// ICD-10 code of the index condition.
    pub condition_code: String,
    pub recommended_tests: Vec<String>,
    pub treatment_options: Vec<String>,
    pub referral_indications: Vec<String>,
}

/// Expected phrases per step. Every set is non-empty and lower-case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepKeywords {
    pub diagnosis: Vec<String>,
    pub differential: Vec<String>,
    pub tests: Vec<String>,
    pub treatment: Vec<String>,
    pub followup: Vec<String>,
}

impl StepKeywords {
    pub fn for_step(&self, step: EvaluationStep) -> &[String] {
        match step {
            EvaluationStep::Diagnosis => &self.diagnosis,
            EvaluationStep::Differential => &self.differential,
            EvaluationStep::Tests => &self.tests,
            EvaluationStep::Treatment => &self.treatment,
            EvaluationStep::Followup => &self.followup,
        }
    }
}

/// A phrase the scorer can match: non-empty, trimmed, and lower-case.
///
/// Answers are lower-cased before matching, so anything else either never
/// matches or, when empty, matches every answer.
pub fn is_match_phrase(phrase: &str) -> bool {
    !phrase.trim().is_empty() && phrase == phrase.to_lowercase().trim()
}

/// Points available per step. Must sum to `StepWeights::RUBRIC_TOTAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepWeights {
    pub diagnosis: u32,
    pub differential: u32,
    pub tests: u32,
    pub treatment: u32,
    pub followup: u32,
}

impl StepWeights {
    /// The maximum rubric total of any case.
    pub const RUBRIC_TOTAL: u32 = 100;

    pub fn for_step(&self, step: EvaluationStep) -> u32 {
        match step {
            EvaluationStep::Diagnosis => self.diagnosis,
            EvaluationStep::Differential => self.differential,
            EvaluationStep::Tests => self.tests,
            EvaluationStep::Treatment => self.treatment,
            EvaluationStep::Followup => self.followup,
        }
    }

    /// Sum of the five weights, or `None` if it overflows `u32`.
    pub fn total(&self) -> Option<u32> {
        EvaluationStep::ORDER
            .iter()
            .try_fold(0u32, |acc, s| acc.checked_add(self.for_step(*s)))
    }
}

impl Default for StepWeights {
    /// The 40/20/15/15/10 split.
    fn default() -> Self {
        Self {
            diagnosis: 40,
            differential: 20,
            tests: 15,
            treatment: 15,
            followup: 10,
        }
    }
}

/// One scripted clinical scenario and its evaluation rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDefinition {
    pub id: CaseId,
    pub name: String,
    /// e.g. "medicina_familia". Used to find similar cases.
    pub specialization: String,
    pub patient: PatientProfile,
    pub presenting_complaint: String,
    pub history_of_present_illness: String,
    pub vital_signs: VitalSigns,
    pub physical_exam: String,
    pub initial_assessment: String,
    pub guidelines: Guidelines,
    pub keywords: StepKeywords,
    pub weights: StepWeights,
    pub education_points: Vec<String>,
}

impl CaseDefinition {
    pub fn keywords_for(&self, step: EvaluationStep) -> &[String] {
        self.keywords.for_step(step)
    }

    pub fn weight_for(&self, step: EvaluationStep) -> u32 {
        self.weights.for_step(step)
    }

    /// Check the catalog-build invariants: weights sum to the rubric total
    /// and each keyword set is non-empty, trimmed, and lower-case.
    pub fn validate(&self) -> ClinsimResult<()> {
        let total = self.weights.total().ok_or_else(|| ClinsimError::ConfigError {
            reason: format!("case '{}' weights overflow", self.id),
        })?;
        if total != StepWeights::RUBRIC_TOTAL {
            return Err(ClinsimError::ConfigError {
                reason: format!(
                    "case '{}' weights sum to {} instead of {}",
                    self.id,
                    total,
                    StepWeights::RUBRIC_TOTAL
                ),
            });
        }

        for step in EvaluationStep::ORDER {
            let keywords = self.keywords_for(step);
            if keywords.is_empty() {
                return Err(ClinsimError::ConfigError {
                    reason: format!("case '{}' has no keywords for step '{}'", self.id, step),
                });
            }
            if let Some(bad) = keywords.iter().find(|k| !is_match_phrase(k)) {
                return Err(ClinsimError::ConfigError {
                    reason: format!(
                        "case '{}' keyword '{}' for step '{}' is not a trimmed lower-case phrase",
                        self.id, bad, step
                    ),
                });
            }
        }

        Ok(())
    }

    /// The short listing entry shown on a dashboard.
    pub fn summary(&self) -> CaseSummary {
        CaseSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.presenting_complaint.clone(),
            patient_label: format!("{}, {} años", self.patient.name, self.patient.age),
            specialization: self.specialization.clone(),
        }
    }
}

/// Listing entry returned by `listAvailableCases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub name: String,
    pub description: String,
    /// e.g. "Carlos, 58 años".
    pub patient_label: String,
    pub specialization: String,
}
