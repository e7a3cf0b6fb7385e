//! The case catalog.
//!
//! `Catalog` holds every case in a fixed order: the authored cases first,
//! then any generated ones. Every case is validated when the catalog is
//! built, and ids must be unique. After construction the catalog is
//! read-only.

use std::collections::BTreeSet;

use tracing::info;

use clinsim_contracts::{
    case::{CaseDefinition, CaseId, CaseSummary},
    error::{ClinsimError, ClinsimResult},
};
use clinsim_core::traits::CaseSource;

use crate::authored::authored_cases;
use crate::generated::generate_cases;

/// Seed used by `Catalog::standard`.
pub const DEFAULT_SEED: u64 = 20_240_601;

/// Number of generated cases in `Catalog::standard`.
pub const DEFAULT_GENERATED_CASES: usize = 20;

/// Default `limit` for `similar_cases`.
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Catalog {
    cases: Vec<CaseDefinition>,
}

impl Catalog {
    /// Build a catalog from `cases`, keeping their order.
    ///
    /// Returns `ClinsimError::ConfigError` if any case fails validation or
    /// two cases share an id.
    pub fn new(cases: Vec<CaseDefinition>) -> ClinsimResult<Self> {
        let mut seen = BTreeSet::new();
        for case in &cases {
            case.validate()?;
            if !seen.insert(case.id.clone()) {
                return Err(ClinsimError::ConfigError {
                    reason: format!("duplicate case id '{}'", case.id),
                });
            }
        }
        Ok(Self { cases })
    }

    /// Only the hand-authored cases.
    pub fn authored() -> ClinsimResult<Self> {
        Self::new(authored_cases()?)
    }

    /// The authored cases followed by `count` cases generated from `seed`.
    pub fn with_generated(seed: u64, count: usize) -> ClinsimResult<Self> {
        let mut cases = authored_cases()?;
        let authored = cases.len();
        cases.extend(generate_cases(seed, count));
        let catalog = Self::new(cases)?;
        info!(authored, generated = count, seed, "case catalog built");
        Ok(catalog)
    }

    /// The default catalog: authored cases plus twenty generated ones.
    pub fn standard() -> ClinsimResult<Self> {
        Self::with_generated(DEFAULT_SEED, DEFAULT_GENERATED_CASES)
    }

    pub fn cases(&self) -> &[CaseDefinition] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Up to `limit` other cases sharing the specialization of `case_id`,
    /// in catalog order.
    pub fn similar_cases(&self, case_id: &CaseId, limit: usize) -> ClinsimResult<Vec<CaseSummary>> {
        let case = self
            .get_case_by_id(case_id)
            .ok_or_else(|| ClinsimError::CaseNotFound {
                case_id: case_id.to_string(),
            })?;

        Ok(self
            .cases
            .iter()
            .filter(|c| c.id != case.id && c.specialization == case.specialization)
            .take(limit)
            .map(|c| c.summary())
            .collect())
    }
}

impl CaseSource for Catalog {
    fn get_case_by_id(&self, case_id: &CaseId) -> Option<&CaseDefinition> {
        self.cases.iter().find(|c| &c.id == case_id)
    }

    fn list_available_cases(&self) -> Vec<CaseSummary> {
        self.cases.iter().map(|c| c.summary()).collect()
    }

    fn case_ids(&self) -> Vec<CaseId> {
        self.cases.iter().map(|c| c.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use clinsim_contracts::{
        case::CaseId,
        error::ClinsimError,
    };
    use clinsim_core::traits::CaseSource;

    use crate::authored::authored_cases;

    use super::{Catalog, DEFAULT_GENERATED_CASES, DEFAULT_SIMILAR_LIMIT};

    #[test]
    fn standard_catalog_has_authored_then_generated() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.len(), 5 + DEFAULT_GENERATED_CASES);

        let ids = catalog.case_ids();
        assert_eq!(ids[0], CaseId::from("hta-primary-001"));
        assert!(ids[5].as_str().starts_with("synthea-"));
    }

    #[test]
    fn standard_catalog_is_stable_across_builds() {
        let a = Catalog::standard().unwrap();
        let b = Catalog::standard().unwrap();
        assert_eq!(a.case_ids(), b.case_ids());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::authored().unwrap();
        let case = catalog
            .get_case_by_id(&CaseId::from("bronchitis-primary-001"))
            .unwrap();
        assert_eq!(case.patient.name, "Isabel");
        assert!(catalog.get_case_by_id(&CaseId::from("missing")).is_none());
    }

    #[test]
    fn summaries_are_in_catalog_order() {
        let catalog = Catalog::authored().unwrap();
        let summaries = catalog.list_available_cases();
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].patient_label, "Carlos, 58 años");
        assert_eq!(summaries[1].id, CaseId::from("dm2-primary-001"));
        assert_eq!(
            summaries[0].description,
            "Control de presión arterial. Refiere dolores de cabeza ocasionales"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut cases = authored_cases().unwrap();
        cases.push(cases[0].clone());
        let err = Catalog::new(cases).unwrap_err();
        assert!(matches!(err, ClinsimError::ConfigError { .. }));
        assert!(err.to_string().contains("hta-primary-001"));
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut cases = authored_cases().unwrap();
        cases[2].weights.followup = 20;
        assert!(Catalog::new(cases).is_err());
    }

    #[test]
    fn empty_catalog_is_allowed() {
        let catalog = Catalog::new(vec![]).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.list_available_cases().is_empty());
    }

    // ── Similar cases ────────────────────────────────────────────────────────

    #[test]
    fn similar_cases_exclude_the_case_itself() {
        let catalog = Catalog::authored().unwrap();
        let similar = catalog
            .similar_cases(&CaseId::from("dm2-primary-001"), DEFAULT_SIMILAR_LIMIT)
            .unwrap();
        assert_eq!(similar.len(), 4);
        assert!(similar.iter().all(|s| s.id != CaseId::from("dm2-primary-001")));
        assert_eq!(similar[0].id, CaseId::from("hta-primary-001"));
    }

    #[test]
    fn similar_cases_respect_the_limit() {
        let catalog = Catalog::standard().unwrap();
        let similar = catalog
            .similar_cases(&CaseId::from("hta-primary-001"), DEFAULT_SIMILAR_LIMIT)
            .unwrap();
        assert_eq!(similar.len(), DEFAULT_SIMILAR_LIMIT);
        assert!(catalog
            .similar_cases(&CaseId::from("hta-primary-001"), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn similar_cases_filter_by_specialization() {
        let mut cases = authored_cases().unwrap();
        cases[4].specialization = "ginecologia".to_string();
        let catalog = Catalog::new(cases).unwrap();

        let similar = catalog
            .similar_cases(&CaseId::from("dysmenorrhea-primary-001"), 5)
            .unwrap();
        assert!(similar.is_empty());

        let similar = catalog.similar_cases(&CaseId::from("hta-primary-001"), 5).unwrap();
        assert_eq!(similar.len(), 3);
    }

    #[test]
    fn similar_cases_unknown_id() {
        let catalog = Catalog::authored().unwrap();
        let err = catalog
            .similar_cases(&CaseId::from("nope"), DEFAULT_SIMILAR_LIMIT)
            .unwrap_err();
        assert!(matches!(err, ClinsimError::CaseNotFound { .. }));
    }
}
