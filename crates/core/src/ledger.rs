//! Allowance-ledger arithmetic.
//!
//! A [`LimitSummary`] is the per-(owner, year) view of the ledger:
//! `total_days` is the administrative allowance, `committed_days` the
//! running tally held by Pending and Approved requests. The persistence
//! side lives in `leavedesk-db`; this module owns the math and the
//! reserve/release policy so it is testable without a database.

use serde::Serialize;

use crate::error::CoreError;

/// Per-(owner, year) allowance snapshot.
///
/// Created on first reference with `total_days = 0`, meaning "no
/// allowance set" — any reservation against it fails until an
/// administrator raises the allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimitSummary {
    pub total_days: i32,
    pub committed_days: i32,
}

impl LimitSummary {
    /// Days still available for new reservations.
    ///
    /// May be negative after a forced overdraft; the ledger never hides
    /// that state.
    pub fn available_days(&self) -> i32 {
        self.total_days - self.committed_days
    }
}

/// Outcome of a successful reservation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The reservation fits within the allowance.
    Within,
    /// Force mode pushed the committed tally past the allowance. The
    /// caller must surface this; it is an audited override, not a
    /// silent success.
    Overdraft,
}

/// Check whether `requested` days may be reserved against `summary`.
///
/// Without `force`, fails with `InsufficientAllowance` when the request
/// exceeds the available days. With `force` it always succeeds but
/// reports [`ReserveOutcome::Overdraft`] when the allowance is exceeded.
/// Submission never forces; force mode exists for administrative
/// callers only.
pub fn check_reserve(
    summary: LimitSummary,
    requested: i32,
    force: bool,
) -> Result<ReserveOutcome, CoreError> {
    let available = summary.available_days();
    if requested <= available {
        Ok(ReserveOutcome::Within)
    } else if force {
        Ok(ReserveOutcome::Overdraft)
    } else {
        Err(CoreError::InsufficientAllowance {
            requested,
            available,
        })
    }
}

/// Committed tally after releasing `days`, floored at zero.
///
/// The floor guards against a double release ever driving the tally
/// negative; transitions are designed so each reservation has exactly
/// one matching release.
pub fn released_tally(committed_days: i32, days: i32) -> i32 {
    (committed_days - days).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn available_is_total_minus_committed() {
        let summary = LimitSummary {
            total_days: 25,
            committed_days: 10,
        };
        assert_eq!(summary.available_days(), 15);
    }

    #[test]
    fn reservation_within_allowance_succeeds() {
        let summary = LimitSummary {
            total_days: 20,
            committed_days: 10,
        };
        assert_eq!(check_reserve(summary, 10, false).unwrap(), ReserveOutcome::Within);
    }

    #[test]
    fn reservation_beyond_allowance_fails_with_numbers() {
        let summary = LimitSummary {
            total_days: 20,
            committed_days: 10,
        };
        match check_reserve(summary, 15, false) {
            Err(CoreError::InsufficientAllowance {
                requested,
                available,
            }) => {
                assert_eq!(requested, 15);
                assert_eq!(available, 10);
            }
            other => panic!("expected InsufficientAllowance, got {other:?}"),
        }
    }

    #[test]
    fn zero_allowance_rejects_any_reservation() {
        let summary = LimitSummary {
            total_days: 0,
            committed_days: 0,
        };
        assert!(check_reserve(summary, 1, false).is_err());
    }

    #[test]
    fn force_mode_reports_overdraft() {
        let summary = LimitSummary {
            total_days: 20,
            committed_days: 18,
        };
        assert_eq!(check_reserve(summary, 5, true).unwrap(), ReserveOutcome::Overdraft);
    }

    #[test]
    fn force_mode_within_allowance_is_not_an_overdraft() {
        let summary = LimitSummary {
            total_days: 20,
            committed_days: 0,
        };
        assert_eq!(check_reserve(summary, 5, true).unwrap(), ReserveOutcome::Within);
    }

    #[test]
    fn release_floors_at_zero() {
        assert_eq!(released_tally(10, 4), 6);
        assert_eq!(released_tally(3, 10), 0);
        assert_eq!(released_tally(0, 1), 0);
    }
}
