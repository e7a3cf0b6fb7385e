//! Scenario 1: Five-step walkthrough
//!
//! One trainee works the hypertension case step by step. The run shows:
//!   1. An out-of-order submission rejected before any scoring
//!   2. Each step scored by the keyword rubric, with feedback
//!   3. A partial-credit treatment plan
//!   4. The reasoning bonus reported outside the 100-point total
//!   5. The attempt stored when the last step is recorded
//!   6. A late submission rejected once the session is completed

use clinsim_contracts::{
    case::CaseId,
    error::{ClinsimError, ClinsimResult},
    session::UserId,
    step::EvaluationStep,
};
use clinsim_core::{Engine, EngineConfig};
use clinsim_store::InMemoryStore;

use crate::catalog::Catalog;
use crate::scenarios::{build_engine, scripts::HTA_WALKTHROUGH};

pub const WALKTHROUGH_CASE: &str = "hta-primary-001";
pub const WALKTHROUGH_USER: &str = "residente-01";

/// Run Scenario 1 against the authored catalog.
pub fn run_scenario(config: &EngineConfig) -> ClinsimResult<()> {
    println!("=== Scenario 1: Five-step walkthrough ===");
    println!();

    let store = InMemoryStore::new();
    let engine = build_engine(Catalog::authored()?, config, &store)?;
    walk(&engine)?;

    println!(
        "  Attempts stored:        {}",
        store.attempt_count()?
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}

fn walk(engine: &Engine) -> ClinsimResult<()> {
    let user = UserId::from(WALKTHROUGH_USER);
    let case_id = CaseId::from(WALKTHROUGH_CASE);

    let case = engine.get_case(&case_id)?;
    println!("  Case:      {} ({})", case.name, case.id);
    println!(
        "  Patient:   {}, {} años, {}",
        case.patient.name, case.patient.age, case.patient.occupation
    );
    println!("  Complaint: {}", case.presenting_complaint);
    println!(
        "  Vitals:    TA {}  FC {}  FR {}  SatO2 {}%  T {:.1}ºC",
        case.vital_signs.blood_pressure,
        case.vital_signs.heart_rate,
        case.vital_signs.respiratory_rate,
        case.vital_signs.oxygen_saturation,
        case.vital_signs.temperature
    );
    println!();

    let mut session = engine.start_case(&user, &case_id)?;

    // ── Out of order ─────────────────────────────────────────────────────────

    match engine.submit_answer_for_step(&mut session, EvaluationStep::Tests, "ECG") {
        Err(e @ ClinsimError::StepOutOfOrder { .. }) => {
            println!("  Jumping ahead to tests: REJECTED ({})", e);
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  Jumping ahead to tests: unexpectedly accepted"),
    }
    println!();

    // ── Scripted answers ─────────────────────────────────────────────────────

    for answer in HTA_WALKTHROUGH {
        let outcome = engine.submit_step_answer(&mut session, answer)?;
        let evaluation = &outcome.evaluation;
        println!(
            "  [{}] {}/{}  running total {}",
            evaluation.step.label(),
            evaluation.score,
            evaluation.max_score,
            outcome.total
        );
        println!("      {}", evaluation.feedback_summary());
        for area in &evaluation.areas_to_improve {
            println!("      to improve: {}", area);
        }
    }
    println!();

    println!("  Final total:            {}/100", session.total());
    println!("  Reasoning bonus:        +{}", session.reasoning_bonus());
    println!(
        "  Cleared:                {}",
        if session.is_cleared(engine.progression()) { "YES" } else { "NO" }
    );

    // ── Late submission ──────────────────────────────────────────────────────

    match engine.submit_step_answer(&mut session, "otra respuesta") {
        Err(e @ ClinsimError::SessionCompleted { .. }) => {
            println!("  Late submission:        REJECTED ({})", e);
        }
        Err(e) => return Err(e),
        Ok(_) => println!("  Late submission:        unexpectedly accepted"),
    }

    Ok(())
}
