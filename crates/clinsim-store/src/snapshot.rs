//! Serializable store snapshots.
//!
//! A `StoreSnapshot` is the full content of a store at one point in time:
//! every attempt in append order and every achievement grant in grant order.
//! It round-trips through JSON so a demo or test run can be saved and
//! reloaded.

use serde::{Deserialize, Serialize};

use clinsim_contracts::{
    achievement::AchievementGrant,
    error::{ClinsimError, ClinsimResult},
    session::SessionAttempt,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub attempts: Vec<SessionAttempt>,
    pub grants: Vec<AchievementGrant>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> ClinsimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ClinsimError::PersistenceFailure {
            reason: format!("failed to serialize store snapshot: {}", e),
        })
    }

    pub fn from_json(s: &str) -> ClinsimResult<Self> {
        serde_json::from_str(s).map_err(|e| ClinsimError::PersistenceFailure {
            reason: format!("failed to parse store snapshot: {}", e),
        })
    }
}
