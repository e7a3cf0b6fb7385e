//! # clinsim-core
//!
//! The step state machine and session aggregation for the clinical
//! simulation engine.
//!
//! This crate provides:
//! - The collaborator traits (`CaseSource`, `StepScorer`, `AttemptStore`, ...)
//! - `CaseSession`, the five-step state machine
//! - `SessionAggregator`, which folds attempt history into player stats
//! - The `Engine` facade that wires them together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinsim_core::{Engine, traits::{CaseSource, StepScorer}};
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod persona;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

pub use aggregate::SessionAggregator;
pub use config::EngineConfig;
pub use engine::{Engine, StepOutcome};
pub use session::CaseSession;
