//! # clinsim-store
//!
//! Append-only attempt history and achievement grants for the clinical
//! simulation engine.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinsim_store::InMemoryStore;
//! use clinsim_core::traits::{AttemptStore, AchievementStore};
//!
//! let store = InMemoryStore::new();
//! store.append_attempt(&attempt)?;
//! let history = store.load_attempts(&user_id)?;
//! ```

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryStore;
pub use snapshot::StoreSnapshot;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use clinsim_contracts::{
        achievement::AchievementId,
        case::CaseId,
        error::ClinsimError,
        session::{AttemptId, SessionAttempt, UserId},
        step::EvaluationStep,
    };
    use clinsim_core::traits::{AchievementStore, AttemptStore};

    use super::{InMemoryStore, StoreSnapshot};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_attempt(user: &str, case: &str, total: u32) -> SessionAttempt {
        let mut step_scores = BTreeMap::new();
        step_scores.insert(EvaluationStep::Diagnosis, total);
        SessionAttempt {
            attempt_id: AttemptId::new(),
            user_id: UserId::from(user),
            case_id: CaseId::from(case),
            case_name: "Caso".to_string(),
            step_scores,
            total_score: total,
            completed: true,
            cleared: total >= 60,
            reasoning_bonus: 0,
            created_at: Utc::now(),
        }
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// Attempts come back in append order, filtered by user.
    #[test]
    fn test_load_filters_by_user_in_order() {
        let store = InMemoryStore::new();
        let first = make_attempt("ana", "a", 40);
        let second = make_attempt("ana", "b", 80);
        store.append_attempt(&first).unwrap();
        store.append_attempt(&make_attempt("luis", "a", 90)).unwrap();
        store.append_attempt(&second).unwrap();

        let history = store.load_attempts(&UserId::from("ana")).unwrap();
        assert_eq!(history, vec![first, second]);
        assert!(store.load_attempts(&UserId::from("nadie")).unwrap().is_empty());
    }

    /// Re-appending the same attempt id leaves one copy.
    #[test]
    fn test_append_is_idempotent() {
        let store = InMemoryStore::new();
        let attempt = make_attempt("ana", "a", 70);
        store.append_attempt(&attempt).unwrap();
        store.append_attempt(&attempt).unwrap();

        assert_eq!(store.attempt_count().unwrap(), 1);
    }

    /// Granting twice records one grant and keeps the first timestamp.
    #[test]
    fn test_grant_is_idempotent() {
        let store = InMemoryStore::new();
        let user = UserId::from("ana");
        let badge = AchievementId::new("first-steps");

        store.grant_achievement(&user, &badge).unwrap();
        let first_grant = store.grants_for(&user).unwrap()[0].granted_at;
        store.grant_achievement(&user, &badge).unwrap();

        let grants = store.grants_for(&user).unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].granted_at, first_grant);
        assert!(store.load_achievement_records(&user).unwrap().contains(&badge));
    }

    /// Grants are per user.
    #[test]
    fn test_grants_are_scoped_to_user() {
        let store = InMemoryStore::new();
        store
            .grant_achievement(&UserId::from("ana"), &AchievementId::new("high-scorer"))
            .unwrap();

        assert!(store
            .load_achievement_records(&UserId::from("luis"))
            .unwrap()
            .is_empty());
    }

    /// Clones share state.
    #[test]
    fn test_clone_shares_state() {
        let store = InMemoryStore::new();
        let handle = store.clone();
        store.append_attempt(&make_attempt("ana", "a", 50)).unwrap();

        assert_eq!(handle.attempt_count().unwrap(), 1);
    }

    /// A snapshot survives a JSON round trip and reloads into a new store.
    #[test]
    fn test_snapshot_round_trip() {
        let store = InMemoryStore::new();
        let user = UserId::from("ana");
        store.append_attempt(&make_attempt("ana", "a", 100)).unwrap();
        store.grant_achievement(&user, &AchievementId::new("perfect-diagnosis")).unwrap();

        let json = store.snapshot().unwrap().to_json().unwrap();
        let restored = InMemoryStore::from_snapshot(StoreSnapshot::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored.snapshot().unwrap(), store.snapshot().unwrap());
        assert_eq!(restored.load_attempts(&user).unwrap().len(), 1);
    }

    /// Duplicates inside a snapshot are collapsed on load.
    #[test]
    fn test_snapshot_duplicates_collapse() {
        let attempt = make_attempt("ana", "a", 100);
        let snapshot = StoreSnapshot {
            attempts: vec![attempt.clone(), attempt],
            grants: vec![],
        };
        let store = InMemoryStore::from_snapshot(snapshot).unwrap();
        assert_eq!(store.attempt_count().unwrap(), 1);
    }

    /// Malformed snapshot JSON is a persistence failure.
    #[test]
    fn test_bad_snapshot_json() {
        let err = StoreSnapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, ClinsimError::PersistenceFailure { .. }));
        assert!(err.is_retryable());
    }
}
