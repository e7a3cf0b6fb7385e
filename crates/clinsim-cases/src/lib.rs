//! # clinsim-cases
//!
//! The case catalog for the clinical simulation engine.
//!
//! - `authored`: the five hand-written primary-care cases in `cases.toml`
//! - `generated`: seeded procedural patients turned into cases
//! - `Catalog`: the validated, read-only case list behind `CaseSource`
//! - `scenarios`: runnable end-to-end walkthroughs used by the demo CLI

pub mod authored;
pub mod catalog;
pub mod generated;
pub mod scenarios;

pub use catalog::Catalog;
