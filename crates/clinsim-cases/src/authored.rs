//! The hand-authored case table.
//!
//! Cases are declared in TOML as an ordered `[[cases]]` array. The built-in
//! table ships inside the crate; `parse_cases` accepts any document of the
//! same shape.

use serde::Deserialize;
use tracing::debug;

use clinsim_contracts::{
    case::CaseDefinition,
    error::{ClinsimError, ClinsimResult},
};

const BUILTIN_CASES: &str = include_str!("../cases.toml");

#[derive(Debug, Deserialize)]
struct CaseFile {
    cases: Vec<CaseDefinition>,
}

/// Parse a `[[cases]]` TOML document.
///
/// Returns `ClinsimError::ConfigError` when the TOML is malformed or a case
/// fails `CaseDefinition::validate`.
pub fn parse_cases(s: &str) -> ClinsimResult<Vec<CaseDefinition>> {
    let file: CaseFile = toml::from_str(s).map_err(|e| ClinsimError::ConfigError {
        reason: format!("failed to parse case TOML: {}", e),
    })?;
    for case in &file.cases {
        case.validate()?;
    }
    debug!(cases = file.cases.len(), "case table loaded");
    Ok(file.cases)
}

/// The five family-medicine cases shipped with the crate.
pub fn authored_cases() -> ClinsimResult<Vec<CaseDefinition>> {
    parse_cases(BUILTIN_CASES)
}
