//! # clinsim-contracts
//!
//! Shared data model for the clinical case simulation engine.
//!
//! Every crate in the workspace imports from here. No scoring, aggregation,
//! or persistence logic lives in this crate: only data definitions, rubric
//! constants, and the error type.

pub mod achievement;
pub mod case;
pub mod chat;
pub mod error;
pub mod evaluation;
pub mod rubric;
pub mod session;
pub mod stats;
pub mod step;
