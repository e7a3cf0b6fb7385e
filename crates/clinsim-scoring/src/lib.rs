//! # clinsim-scoring
//!
//! Scoring strategies for the clinical simulation engine.
//!
//! - `ComplianceScorer`: the deterministic keyword rubric, plus the
//!   whole-protocol evaluation and performance levels
//! - `AssistedScorer`: an external free-text evaluator behind a validating
//!   fallback wrapper
//!
//! Both implement `clinsim_core::traits::StepScorer`.

pub mod external;
pub mod prompt;
pub mod protocol;
pub mod rubric;

#[cfg(test)]
mod testing;

pub use external::AssistedScorer;
pub use protocol::{PerformanceLevel, ProtocolEvaluation};
pub use rubric::ComplianceScorer;
