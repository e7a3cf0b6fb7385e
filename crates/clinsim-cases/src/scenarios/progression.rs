//! Scenario 2: Progression and achievements
//!
//! One trainee works every authored case, including a failed first try on
//! diabetes and a weaker replay of hypertension. The run shows:
//!   1. Best-score aggregation: replays never lower a case's best
//!   2. Cleared versus attempted cases
//!   3. Per-step performance across the whole history
//!   4. Badges granted once and reported as newly unlocked only the first time

use clinsim_contracts::{
    case::CaseId,
    error::ClinsimResult,
    session::UserId,
};
use clinsim_core::{Engine, EngineConfig};
use clinsim_store::InMemoryStore;

use crate::catalog::Catalog;
use crate::scenarios::{build_engine, play_case, scripts, stored_attempt};

pub const PROGRESSION_USER: &str = "residente-02";

/// The attempts played, in order.
pub const PLAYLIST: [(&str, [&str; 5]); 7] = [
    ("hta-primary-001", scripts::HTA_STRONG),
    ("dm2-primary-001", scripts::DM2_WEAK),
    ("dm2-primary-001", scripts::DM2_STRONG),
    ("depression-primary-001", scripts::DEPRESSION_STRONG),
    ("bronchitis-primary-001", scripts::BRONCHITIS_STRONG),
    ("dysmenorrhea-primary-001", scripts::DYSMENORRHEA_STRONG),
    ("hta-primary-001", scripts::HTA_WEAK),
];

/// Run Scenario 2 against the authored catalog.
pub fn run_scenario(config: &EngineConfig) -> ClinsimResult<()> {
    println!("=== Scenario 2: Progression and achievements ===");
    println!();

    let store = InMemoryStore::new();
    let engine = build_engine(Catalog::authored()?, config, &store)?;
    let user = UserId::from(PROGRESSION_USER);

    play_all(&engine, &user)?;
    println!();

    let report = engine.get_user_stats(&user)?;
    println!("  Sessions:               {}", report.stats.total_sessions);
    println!("  Cases attempted:        {}", report.cases_attempted);
    println!("  Total points:           {}", report.stats.total_points);
    println!("  Perfect scores:         {}", report.stats.perfect_scores);
    println!("  Average score:          {}", report.average_score);
    println!(
        "  All cases completed:    {}",
        if report.stats.all_cases_completed { "YES" } else { "NO" }
    );
    println!();

    println!("  Best per case:");
    for progress in &report.progress {
        println!(
            "    {:<26} best {:>3}  attempts {}  {}",
            progress.case_id,
            progress.best_score,
            progress.attempts,
            if progress.cleared { "cleared" } else { "not cleared" }
        );
    }
    println!();

    println!("  Mean score per step:");
    for (step, mean) in &report.performance_by_step {
        println!("    {:<22} {}", step.label(), mean);
    }
    println!();

    let achievements = engine.get_unlocked_achievements(&user)?;
    println!(
        "  Achievements: {} unlocked, {} locked",
        achievements.unlocked.len(),
        achievements.locked.len()
    );
    for badge in &achievements.newly_unlocked {
        println!("    NEW  {} {} ({})", badge.icon, badge.name, badge.description);
    }
    for badge in &achievements.locked {
        println!("    ---  {} ({})", badge.name, badge.description);
    }

    let again = engine.get_unlocked_achievements(&user)?;
    println!(
        "  Second check:           {} newly unlocked",
        again.newly_unlocked.len()
    );
    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}

/// Play every entry of `PLAYLIST` for `user`.
fn play_all(engine: &Engine, user: &UserId) -> ClinsimResult<()> {
    for (case_id, answers) in PLAYLIST.iter() {
        let outcomes = play_case(engine, user, &CaseId::from(*case_id), answers)?;
        let Some(attempt) = stored_attempt(&outcomes) else {
            continue;
        };
        println!(
            "  {:<26} {:>3}/100  {}",
            attempt.case_id,
            attempt.total_score,
            if attempt.cleared { "cleared" } else { "not cleared" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clinsim_contracts::{
        achievement::AchievementId,
        case::CaseId,
        session::UserId,
        step::EvaluationStep,
    };
    use clinsim_core::EngineConfig;
    use clinsim_store::InMemoryStore;

    use crate::catalog::Catalog;
    use crate::scenarios::{build_engine, play_case, scripts, stored_attempt};

    use super::{play_all, run_scenario, PROGRESSION_USER};

    fn ids(achievements: &[clinsim_contracts::achievement::Achievement]) -> Vec<&str> {
        achievements.iter().map(|a| a.id.as_str()).collect()
    }

    // ── Scripted totals ──────────────────────────────────────────────────────

    /// Every strong script earns full marks on its case.
    #[test]
    fn test_strong_scripts_score_100() {
        let store = InMemoryStore::new();
        let engine = build_engine(Catalog::authored().unwrap(), &EngineConfig::default(), &store).unwrap();
        let user = UserId::from("ana");

        for (case_id, answers) in [
            ("hta-primary-001", scripts::HTA_STRONG),
            ("dm2-primary-001", scripts::DM2_STRONG),
            ("depression-primary-001", scripts::DEPRESSION_STRONG),
            ("bronchitis-primary-001", scripts::BRONCHITIS_STRONG),
            ("dysmenorrhea-primary-001", scripts::DYSMENORRHEA_STRONG),
        ] {
            let outcomes = play_case(&engine, &user, &CaseId::from(case_id), &answers).unwrap();
            let attempt = stored_attempt(&outcomes).unwrap();
            assert_eq!(attempt.total_score, 100, "{}", case_id);
        }
    }

    /// The weak diabetes script lands below the completion threshold.
    #[test]
    fn test_weak_dm2_is_not_cleared() {
        let store = InMemoryStore::new();
        let engine = build_engine(Catalog::authored().unwrap(), &EngineConfig::default(), &store).unwrap();
        let outcomes = play_case(
            &engine,
            &UserId::from("ana"),
            &CaseId::from("dm2-primary-001"),
            &scripts::DM2_WEAK,
        )
        .unwrap();

        let attempt = stored_attempt(&outcomes).unwrap();
        assert_eq!(attempt.total_score, 54);
        assert_eq!(attempt.step_score(EvaluationStep::Differential), 0);
        assert_eq!(attempt.step_score(EvaluationStep::Tests), 7);
        assert!(!attempt.cleared);
    }

    // ── Aggregation ──────────────────────────────────────────────────────────

    /// Replaying a case with a lower score keeps the earlier best.
    #[test]
    fn test_stats_after_full_playlist() {
        let store = InMemoryStore::new();
        let engine = build_engine(Catalog::authored().unwrap(), &EngineConfig::default(), &store).unwrap();
        let user = UserId::from(PROGRESSION_USER);
        play_all(&engine, &user).unwrap();

        let report = engine.get_user_stats(&user).unwrap();
        assert_eq!(report.stats.total_sessions, 7);
        assert_eq!(report.stats.total_points, 500);
        assert_eq!(report.stats.perfect_scores, 5);
        assert!(report.stats.all_cases_completed);
        assert_eq!(report.cases_attempted, 5);
        assert_eq!(report.average_score, 85);
        assert_eq!(
            report.stats.best_scores.get(&CaseId::from("hta-primary-001")),
            Some(&100)
        );

        let hta = report
            .progress
            .iter()
            .find(|p| p.case_id == CaseId::from("hta-primary-001"))
            .unwrap();
        assert_eq!(hta.attempts, 2);
        assert!(hta.cleared);

        assert_eq!(report.performance_by_step[&EvaluationStep::Diagnosis], 40);
    }

    // ── Achievements ─────────────────────────────────────────────────────────

    /// Eleven of the thirteen built-in badges unlock; a second check grants nothing new.
    #[test]
    fn test_achievements_after_full_playlist() {
        let store = InMemoryStore::new();
        let engine = build_engine(Catalog::authored().unwrap(), &EngineConfig::default(), &store).unwrap();
        let user = UserId::from(PROGRESSION_USER);
        play_all(&engine, &user).unwrap();

        let report = engine.get_unlocked_achievements(&user).unwrap();
        assert_eq!(report.unlocked.len(), 11);
        assert_eq!(report.newly_unlocked.len(), 11);
        assert_eq!(ids(&report.locked), vec!["specialist", "elite-doctor"]);
        assert!(ids(&report.unlocked).contains(&"all-cases"));
        assert!(ids(&report.unlocked).contains(&"high-scorer"));

        let grants = store.grants_for(&user).unwrap();
        assert_eq!(grants.len(), 11);
        assert!(grants
            .iter()
            .any(|g| g.achievement_id == AchievementId::new("first-steps")));

        let again = engine.get_unlocked_achievements(&user).unwrap();
        assert!(again.newly_unlocked.is_empty());
        assert_eq!(again.unlocked.len(), 11);
        assert_eq!(store.grants_for(&user).unwrap().len(), 11);
    }

    /// A fresh trainee has every badge locked.
    #[test]
    fn test_no_history_unlocks_nothing() {
        let store = InMemoryStore::new();
        let engine = build_engine(Catalog::authored().unwrap(), &EngineConfig::default(), &store).unwrap();
        let report = engine.get_unlocked_achievements(&UserId::from("nadie")).unwrap();
        assert!(report.unlocked.is_empty());
        assert_eq!(report.locked.len(), 13);
        assert_eq!(report.stats.total_sessions, 0);
    }

    #[test]
    fn test_run_scenario() {
        run_scenario(&EngineConfig::default()).unwrap();
    }
}
