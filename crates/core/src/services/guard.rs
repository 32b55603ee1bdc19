//! Review-submission abuse guard.
//!
//! Tracks failed unique-code attempts per user and enforces a timed lockout
//! after repeated failures. The transition logic lives in [`GuardState`],
//! detached from persistence; [`GuardService`] applies transitions to the
//! user row. Suspension fields on the user are mutated nowhere else.

use chrono::{DateTime, Duration, Utc};
use sea_orm::Set;
use storefront_common::AppResult;
use storefront_db::{entities::user, repositories::UserRepository};

/// Failed attempts that trigger a suspension.
pub const MAX_FAIL_ATTEMPTS: i32 = 3;

/// How long a suspension lasts, in hours.
pub const SUSPENSION_HOURS: i64 = 1;

/// Outcome of the pre-submission gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Not suspended, or an expired suspension was just reset.
    Proceed,
    /// Suspension still in its lockout window.
    Blocked,
}

/// Outcome of recording a code-validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeDecision {
    /// Successful attempt; counters reset.
    Allowed,
    /// Failed attempt below the threshold.
    Rejected {
        /// Failed attempts so far, including this one.
        fail_attempts: i32,
    },
    /// This failure crossed the threshold; the user is suspended as of now.
    SuspendedNow {
        /// When the suspension lifts.
        lift_time: DateTime<Utc>,
    },
}

/// Per-user guard state, detached from persistence.
///
/// Invariant: `suspension_lift_time` is set iff `is_suspended`, and
/// `fail_attempts` is 0 whenever `is_suspended` transitions to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardState {
    pub is_suspended: bool,
    pub fail_attempts: i32,
    pub suspension_lift_time: Option<DateTime<Utc>>,
}

impl GuardState {
    /// Extract the guard state from a user row.
    #[must_use]
    pub fn of(user: &user::Model) -> Self {
        Self {
            is_suspended: user.is_suspended,
            fail_attempts: user.fail_attempts,
            suspension_lift_time: user
                .suspension_lift_time
                .map(|t| t.with_timezone(&Utc)),
        }
    }

    /// Gate an attempt, resolving an expired suspension lazily.
    ///
    /// Returns the decision and the state to persist. The state is unchanged
    /// unless an expired suspension was reset.
    #[must_use]
    pub fn gate(self, now: DateTime<Utc>) -> (GateDecision, Self) {
        if !self.is_suspended {
            return (GateDecision::Proceed, self);
        }

        match self.suspension_lift_time {
            Some(lift_time) if now >= lift_time => (GateDecision::Proceed, Self::default()),
            _ => (GateDecision::Blocked, self),
        }
    }

    /// Record the outcome of an attempt that was allowed through the gate.
    #[must_use]
    pub fn record(self, success: bool, now: DateTime<Utc>) -> (OutcomeDecision, Self) {
        if success {
            return (OutcomeDecision::Allowed, Self::default());
        }

        let fail_attempts = self.fail_attempts + 1;
        if fail_attempts >= MAX_FAIL_ATTEMPTS {
            let lift_time = now + Duration::hours(SUSPENSION_HOURS);
            (
                OutcomeDecision::SuspendedNow { lift_time },
                Self {
                    is_suspended: true,
                    fail_attempts,
                    suspension_lift_time: Some(lift_time),
                },
            )
        } else {
            (
                OutcomeDecision::Rejected { fail_attempts },
                Self {
                    is_suspended: false,
                    fail_attempts,
                    suspension_lift_time: None,
                },
            )
        }
    }
}

/// Applies guard transitions to the user row.
///
/// Every mutation is a read-modify-write against the user record, persisted
/// before the caller builds its response. No-op transitions skip the write.
#[derive(Clone)]
pub struct GuardService {
    user_repo: UserRepository,
}

impl GuardService {
    /// Create a new guard service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Gate a submission attempt, resetting an expired suspension.
    ///
    /// Returns the decision together with the (possibly updated) user row so
    /// the caller keeps operating on current state.
    pub async fn check_and_maybe_reset(
        &self,
        user: user::Model,
        now: DateTime<Utc>,
    ) -> AppResult<(GateDecision, user::Model)> {
        let current = GuardState::of(&user);
        let (decision, next) = current.gate(now);

        let user = if next == current {
            user
        } else {
            self.persist(user, next).await?
        };

        Ok((decision, user))
    }

    /// Record the outcome of an attempt that passed the gate.
    pub async fn record_outcome(
        &self,
        user: user::Model,
        success: bool,
        now: DateTime<Utc>,
    ) -> AppResult<(OutcomeDecision, user::Model)> {
        let current = GuardState::of(&user);
        let (decision, next) = current.record(success, now);

        let user = if next == current {
            user
        } else {
            self.persist(user, next).await?
        };

        Ok((decision, user))
    }

    async fn persist(&self, user: user::Model, state: GuardState) -> AppResult<user::Model> {
        let mut active: user::ActiveModel = user.into();
        active.is_suspended = Set(state.is_suspended);
        active.fail_attempts = Set(state.fail_attempts);
        active.suspension_lift_time = Set(state.suspension_lift_time.map(Into::into));
        active.updated_at = Set(Some(Utc::now().into()));
        self.user_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn active(fail_attempts: i32) -> GuardState {
        GuardState {
            is_suspended: false,
            fail_attempts,
            suspension_lift_time: None,
        }
    }

    fn suspended(lift_time: DateTime<Utc>) -> GuardState {
        GuardState {
            is_suspended: true,
            fail_attempts: MAX_FAIL_ATTEMPTS,
            suspension_lift_time: Some(lift_time),
        }
    }

    // === Pure state machine ===

    #[test]
    fn test_gate_passes_active_user_unchanged() {
        let now = Utc::now();
        let (decision, next) = active(2).gate(now);
        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(next, active(2));
    }

    #[test]
    fn test_gate_blocks_within_lockout_window() {
        let now = Utc::now();
        let state = suspended(now + Duration::minutes(30));
        let (decision, next) = state.gate(now);
        assert_eq!(decision, GateDecision::Blocked);
        assert_eq!(next, state);
    }

    #[test]
    fn test_gate_resets_expired_suspension() {
        let now = Utc::now();
        let (decision, next) = suspended(now - Duration::seconds(1)).gate(now);
        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(next, GuardState::default());

        // Gating again immediately still proceeds with zeroed counters.
        let (decision, next) = next.gate(now);
        assert_eq!(decision, GateDecision::Proceed);
        assert_eq!(next.fail_attempts, 0);
    }

    #[test]
    fn test_gate_reset_at_exact_lift_time() {
        let now = Utc::now();
        let (decision, _) = suspended(now).gate(now);
        assert_eq!(decision, GateDecision::Proceed);
    }

    #[test]
    fn test_failures_accumulate_below_threshold() {
        let now = Utc::now();
        let (decision, state) = active(0).record(false, now);
        assert_eq!(decision, OutcomeDecision::Rejected { fail_attempts: 1 });
        let (decision, state) = state.record(false, now);
        assert_eq!(decision, OutcomeDecision::Rejected { fail_attempts: 2 });
        assert!(!state.is_suspended);
    }

    #[test]
    fn test_third_failure_suspends_for_one_hour() {
        let now = Utc::now();
        let (decision, state) = active(2).record(false, now);

        let lift_time = now + Duration::hours(SUSPENSION_HOURS);
        assert_eq!(decision, OutcomeDecision::SuspendedNow { lift_time });
        assert!(state.is_suspended);
        assert_eq!(state.fail_attempts, MAX_FAIL_ATTEMPTS);
        assert_eq!(state.suspension_lift_time, Some(lift_time));
    }

    #[test]
    fn test_success_resets_counters() {
        let now = Utc::now();
        let (decision, state) = active(2).record(true, now);
        assert_eq!(decision, OutcomeDecision::Allowed);
        assert_eq!(state, GuardState::default());
    }

    // === Persisting service ===

    fn test_user(state: GuardState) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            email: "buyer@example.com".to_string(),
            name: "Buyer".to_string(),
            token: None,
            is_suspended: state.is_suspended,
            fail_attempts: state.fail_attempts,
            suspension_lift_time: state.suspension_lift_time.map(Into::into),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_blocked_user_is_not_written() {
        // No mock results queued: any write would error out.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let guard = GuardService::new(UserRepository::new(db));

        let now = Utc::now();
        let user = test_user(suspended(now + Duration::minutes(10)));
        let (decision, unchanged) = guard.check_and_maybe_reset(user.clone(), now).await.unwrap();

        assert_eq!(decision, GateDecision::Blocked);
        assert_eq!(unchanged, user);
    }

    #[tokio::test]
    async fn test_expired_suspension_reset_is_persisted() {
        let now = Utc::now();
        let reset = test_user(GuardState::default());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reset.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let guard = GuardService::new(UserRepository::new(db));

        let user = test_user(suspended(now - Duration::minutes(1)));
        let (decision, updated) = guard.check_and_maybe_reset(user, now).await.unwrap();

        assert_eq!(decision, GateDecision::Proceed);
        assert!(!updated.is_suspended);
        assert_eq!(updated.fail_attempts, 0);
        assert!(updated.suspension_lift_time.is_none());
    }

    #[tokio::test]
    async fn test_success_with_clean_state_skips_the_write() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let guard = GuardService::new(UserRepository::new(db));

        let now = Utc::now();
        let user = test_user(active(0));
        let (decision, _) = guard.record_outcome(user, true, now).await.unwrap();

        assert_eq!(decision, OutcomeDecision::Allowed);
    }
}
