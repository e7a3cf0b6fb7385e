//! Clinical Simulation Engine demo CLI
//!
//! Runs the reference scenarios and exposes the catalog and the
//! whole-protocol evaluator from the command line. Every command uses the
//! real components (catalog, compliance scorer, achievement table, store).
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- walkthrough
//!   cargo run -p demo -- progression
//!   cargo run -p demo -- list-cases
//!   cargo run -p demo -- similar --case hta-primary-001
//!   cargo run -p demo -- evaluate --case hta-primary-001 --answer "..."
//!   cargo run -p demo -- --config engine.toml run-all

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinsim_cases::{
    catalog::DEFAULT_SIMILAR_LIMIT,
    scenarios::{progression, walkthrough},
    Catalog,
};
use clinsim_contracts::{
    case::CaseId,
    error::{ClinsimError, ClinsimResult},
};
use clinsim_core::{traits::CaseSource, EngineConfig};
use clinsim_scoring::ComplianceScorer;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Clinical simulation engine demo.
///
/// Each subcommand runs a scenario or queries the case catalog, using the
/// default rubric unless `--config` names an engine TOML file.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Clinical simulation engine demo",
    long_about = "Runs clinical case scenarios showing step-ordered scoring,\n\
                  best-score aggregation, and achievement unlocking."
)]
struct Cli {
    /// Engine configuration TOML (progression thresholds and rubric).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both scenarios in sequence.
    RunAll,
    /// Scenario 1: Five-step walkthrough of the hypertension case.
    Walkthrough,
    /// Scenario 2: Progression across every authored case and the badges it earns.
    Progression,
    /// List the standard catalog (authored plus generated cases).
    ListCases,
    /// List cases sharing a case's specialization.
    Similar {
        #[arg(long)]
        case: String,
        #[arg(long, default_value_t = DEFAULT_SIMILAR_LIMIT)]
        limit: usize,
    },
    /// Score one free-text response against every criterion of a case.
    Evaluate {
        #[arg(long)]
        case: String,
        #[arg(long)]
        answer: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Command::RunAll => run_all(&config),
        Command::Walkthrough => walkthrough::run_scenario(&config),
        Command::Progression => progression::run_scenario(&config),
        Command::ListCases => list_cases(),
        Command::Similar { case, limit } => similar(&case, limit),
        Command::Evaluate { case, answer } => evaluate(&config, &case, &answer),
    });

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> ClinsimResult<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::from_file(path)?;
            info!(path = %path.display(), "engine configuration loaded from file");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all(config: &EngineConfig) -> ClinsimResult<()> {
    walkthrough::run_scenario(config)?;
    progression::run_scenario(config)?;
    Ok(())
}

fn list_cases() -> ClinsimResult<()> {
    let catalog = Catalog::standard()?;
    println!("{} cases:", catalog.len());
    for summary in catalog.list_available_cases() {
        println!(
            "  {:<28} {:<34} {}",
            summary.id, summary.name, summary.patient_label
        );
        println!("  {:<28} {}", "", summary.description);
    }
    println!();
    Ok(())
}

fn similar(case_id: &str, limit: usize) -> ClinsimResult<()> {
    let catalog = Catalog::standard()?;
    let similar = catalog.similar_cases(&CaseId::from(case_id), limit)?;
    println!("Cases similar to {}:", case_id);
    for summary in similar {
        println!("  {:<28} {}", summary.id, summary.name);
    }
    println!();
    Ok(())
}

fn evaluate(config: &EngineConfig, case_id: &str, answer: &str) -> ClinsimResult<()> {
    let catalog = Catalog::standard()?;
    let case_id = CaseId::from(case_id);
    let case = catalog
        .get_case_by_id(&case_id)
        .ok_or_else(|| ClinsimError::CaseNotFound {
            case_id: case_id.to_string(),
        })?;

    let scorer = ComplianceScorer::new(config.rubric.clone());
    let evaluation = scorer.evaluate_protocol(case, answer);

    println!("Case: {} ({})", case.name, case.id);
    println!();
    for criterion in &evaluation.criteria {
        println!(
            "  {:<22} {:>3}/{:<3} {}",
            criterion.step.label(),
            criterion.score,
            criterion.max_score,
            criterion.feedback_summary()
        );
    }
    println!(
        "  {:<22} +{}   {}",
        evaluation.reasoning_feedback.criterion,
        evaluation.reasoning_bonus,
        evaluation.reasoning_feedback.message
    );
    println!();
    println!("  Rubric total:   {}/100", evaluation.rubric_total);
    println!("  With bonus:     {}", evaluation.total_score);
    println!(
        "  Performance:    {} ({})",
        evaluation.performance,
        evaluation.performance.description()
    );
    println!("  Next:           {}", evaluation.performance.recommended_action());

    if !evaluation.areas_to_improve.is_empty() {
        println!();
        println!("  Areas to improve:");
        for area in &evaluation.areas_to_improve {
            println!("    - {}", area);
        }
    }
    if !evaluation.education_notes.is_empty() {
        println!();
        println!("  Education notes:");
        for note in &evaluation.education_notes {
            println!("    - {}", note);
        }
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Clinical Evaluation & Progression Engine");
    println!("Primary Care Demo");
    println!("========================================");
    println!();
    println!("Per case session:");
    println!("  [1] Diagnosis      [2] Differential   [3] Tests");
    println!("  [4] Treatment      [5] Follow-up");
    println!("  Steps are scored in order; the attempt is stored after step 5.");
    println!("  Best score per case feeds the stats and the achievement table.");
    println!();
}
