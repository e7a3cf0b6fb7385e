//! Runnable reference scenarios.
//!
//! Each scenario wires the real components (catalog, compliance scorer,
//! built-in achievement table, in-memory store) into an `Engine` and drives
//! it with scripted answers.

pub mod progression;
pub mod scripts;
pub mod walkthrough;

use clinsim_achievements::TomlAchievementBook;
use clinsim_contracts::{
    case::CaseId,
    error::ClinsimResult,
    session::{SessionAttempt, UserId},
};
use clinsim_core::{Engine, EngineConfig, StepOutcome};
use clinsim_scoring::ComplianceScorer;
use clinsim_store::InMemoryStore;

use crate::catalog::Catalog;

/// Build an engine over `catalog` backed by `store`.
///
/// `store` is shared: the caller keeps its handle for inspection.
pub fn build_engine(
    catalog: Catalog,
    config: &EngineConfig,
    store: &InMemoryStore,
) -> ClinsimResult<Engine> {
    let rules = TomlAchievementBook::builtin()?;
    Ok(Engine::new(
        Box::new(catalog),
        Box::new(ComplianceScorer::new(config.rubric.clone())),
        Box::new(rules),
        Box::new(store.clone()),
        Box::new(store.clone()),
        config.progression.clone(),
    ))
}

/// Play one case start to finish with five scripted answers.
///
/// Returns every step outcome; the last one carries the stored attempt.
pub fn play_case(
    engine: &Engine,
    user_id: &UserId,
    case_id: &CaseId,
    answers: &[&str; 5],
) -> ClinsimResult<Vec<StepOutcome>> {
    let mut session = engine.start_case(user_id, case_id)?;
    answers
        .iter()
        .map(|answer| engine.submit_step_answer(&mut session, answer))
        .collect()
}

/// The attempt stored by the final outcome of `play_case`, if any.
pub fn stored_attempt(outcomes: &[StepOutcome]) -> Option<&SessionAttempt> {
    outcomes.last().and_then(|o| o.attempt.as_ref())
}
