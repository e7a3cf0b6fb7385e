//! In-memory implementation of `AttemptStore` and `AchievementStore`.
//!
//! `InMemoryStore` keeps attempts and grants in `Vec`s protected by a
//! `Mutex`. Cloning the store clones the `Arc`, so the engine can hold one
//! handle per trait while the caller keeps another for inspection.
//!
//! Both write paths are idempotent: an attempt id or a (user, achievement)
//! pair that is already stored is skipped.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use clinsim_contracts::{
    achievement::{AchievementGrant, AchievementId},
    error::{ClinsimError, ClinsimResult},
    session::{SessionAttempt, UserId},
};
use clinsim_core::traits::{AchievementStore, AttemptStore};

use crate::snapshot::StoreSnapshot;

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct InMemoryState {
    /// Every attempt, in append order.
    pub(crate) attempts: Vec<SessionAttempt>,

    /// Every grant, in grant order.
    pub(crate) grants: Vec<AchievementGrant>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with a snapshot.
    ///
    /// Duplicate attempt ids and grants in the snapshot are collapsed.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> ClinsimResult<Self> {
        let store = Self::new();
        for attempt in &snapshot.attempts {
            store.append_attempt(attempt)?;
        }
        {
            let mut state = store.lock()?;
            for grant in snapshot.grants {
                let exists = state.grants.iter().any(|g| {
                    g.user_id == grant.user_id && g.achievement_id == grant.achievement_id
                });
                if !exists {
                    state.grants.push(grant);
                }
            }
        }
        Ok(store)
    }

    /// Copy out everything stored so far.
    pub fn snapshot(&self) -> ClinsimResult<StoreSnapshot> {
        let state = self.lock()?;
        Ok(StoreSnapshot {
            attempts: state.attempts.clone(),
            grants: state.grants.clone(),
        })
    }

    /// Grants for one user with their timestamps, in grant order.
    pub fn grants_for(&self, user_id: &UserId) -> ClinsimResult<Vec<AchievementGrant>> {
        let state = self.lock()?;
        Ok(state
            .grants
            .iter()
            .filter(|g| &g.user_id == user_id)
            .cloned()
            .collect())
    }

    pub fn attempt_count(&self) -> ClinsimResult<usize> {
        Ok(self.lock()?.attempts.len())
    }

    fn lock(&self) -> ClinsimResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| ClinsimError::PersistenceFailure {
            reason: format!("store state lock poisoned: {}", e),
        })
    }
}

// ── AttemptStore impl ─────────────────────────────────────────────────────────

impl AttemptStore for InMemoryStore {
    fn load_attempts(&self, user_id: &UserId) -> ClinsimResult<Vec<SessionAttempt>> {
        let state = self.lock()?;
        Ok(state
            .attempts
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn append_attempt(&self, attempt: &SessionAttempt) -> ClinsimResult<()> {
        let mut state = self.lock()?;

        if state.attempts.iter().any(|a| a.attempt_id == attempt.attempt_id) {
            debug!(attempt_id = %attempt.attempt_id, "attempt already stored, skipping");
            return Ok(());
        }

        state.attempts.push(attempt.clone());
        info!(
            attempt_id = %attempt.attempt_id,
            user_id = %attempt.user_id,
            case_id = %attempt.case_id,
            total_score = attempt.total_score,
            stored = state.attempts.len(),
            "attempt appended"
        );
        Ok(())
    }
}

// ── AchievementStore impl ─────────────────────────────────────────────────────

impl AchievementStore for InMemoryStore {
    fn load_achievement_records(&self, user_id: &UserId) -> ClinsimResult<BTreeSet<AchievementId>> {
        let state = self.lock()?;
        Ok(state
            .grants
            .iter()
            .filter(|g| &g.user_id == user_id)
            .map(|g| g.achievement_id.clone())
            .collect())
    }

    fn grant_achievement(&self, user_id: &UserId, achievement_id: &AchievementId) -> ClinsimResult<()> {
        let mut state = self.lock()?;

        let exists = state
            .grants
            .iter()
            .any(|g| &g.user_id == user_id && &g.achievement_id == achievement_id);
        if exists {
            return Ok(());
        }

        state.grants.push(AchievementGrant {
            user_id: user_id.clone(),
            achievement_id: achievement_id.clone(),
            granted_at: Utc::now(),
        });
        Ok(())
    }
}
