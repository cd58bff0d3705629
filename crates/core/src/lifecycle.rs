//! Vacation request lifecycle state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API/repository layer and any future worker or CLI tooling.
//! Status discriminants match the SMALLINT `status` column on the
//! `vacation_requests` table (1-based).

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle status of a vacation request.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Owned and editable by its owner; invisible to approvers' queues.
    Draft = 1,
    /// Submitted for approval; days are reserved against the allowance.
    Pending = 2,
    /// Granted. Terminal except for the single edge to `Cancelled`.
    Approved = 3,
    /// Declined by an approver. Terminal.
    Rejected = 4,
    /// Withdrawn by the owner or an approver. Terminal.
    Cancelled = 5,
}

impl RequestStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status ID back to a status, if valid.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Draft),
            2 => Some(Self::Pending),
            3 => Some(Self::Approved),
            4 => Some(Self::Rejected),
            5 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human-readable name (for error messages and logs).
    pub fn name(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl From<RequestStatus> for StatusId {
    fn from(value: RequestStatus) -> Self {
        value as StatusId
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An event applied to a vacation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Owner edits periods/comment. Draft only.
    Edit,
    /// Owner submits for approval. Draft -> Pending.
    Submit,
    /// Owner deletes the request outright. Draft only.
    Delete,
    /// Approver grants the request. Pending -> Approved.
    Approve,
    /// Approver declines the request. Pending -> Rejected.
    Reject,
    /// Owner or approver withdraws. Pending/Approved -> Cancelled.
    Cancel,
}

impl LifecycleEvent {
    /// Human-readable name (for error messages and logs).
    pub fn name(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Submit => "submit",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the set of events legal from `status`.
///
/// Terminal states (Rejected, Cancelled) return an empty slice because
/// no further transitions are allowed.
pub fn valid_events(status: RequestStatus) -> &'static [LifecycleEvent] {
    use LifecycleEvent::*;
    match status {
        RequestStatus::Draft => &[Edit, Submit, Delete],
        RequestStatus::Pending => &[Approve, Reject, Cancel],
        RequestStatus::Approved => &[Cancel],
        RequestStatus::Rejected | RequestStatus::Cancelled => &[],
    }
}

/// Check whether `event` is legal from `status`.
pub fn can_apply(status: RequestStatus, event: LifecycleEvent) -> bool {
    valid_events(status).contains(&event)
}

/// Validate a transition, returning `InvalidTransition` for illegal ones.
pub fn validate_transition(
    status: RequestStatus,
    event: LifecycleEvent,
) -> Result<(), crate::error::CoreError> {
    if can_apply(status, event) {
        Ok(())
    } else {
        Err(crate::error::CoreError::InvalidTransition {
            from: status,
            event,
        })
    }
}

/// The status a request lands in after `event`, for events that change
/// status. `Edit` keeps the request in Draft; `Delete` removes the row.
pub fn target_status(event: LifecycleEvent) -> Option<RequestStatus> {
    match event {
        LifecycleEvent::Edit => Some(RequestStatus::Draft),
        LifecycleEvent::Submit => Some(RequestStatus::Pending),
        LifecycleEvent::Approve => Some(RequestStatus::Approved),
        LifecycleEvent::Reject => Some(RequestStatus::Rejected),
        LifecycleEvent::Cancel => Some(RequestStatus::Cancelled),
        LifecycleEvent::Delete => None,
    }
}

/// Whether a status commits days against the owner's allowance.
///
/// Pending and Approved requests hold a reservation; Draft never
/// reserved, and terminal states have released theirs.
pub fn commits_allowance(status: RequestStatus) -> bool {
    matches!(status, RequestStatus::Pending | RequestStatus::Approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    const ALL_STATUSES: [RequestStatus; 5] = [
        RequestStatus::Draft,
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ];

    const ALL_EVENTS: [LifecycleEvent; 6] = [
        LifecycleEvent::Edit,
        LifecycleEvent::Submit,
        LifecycleEvent::Delete,
        LifecycleEvent::Approve,
        LifecycleEvent::Reject,
        LifecycleEvent::Cancel,
    ];

    #[test]
    fn draft_allows_edit_submit_delete() {
        assert!(can_apply(RequestStatus::Draft, LifecycleEvent::Edit));
        assert!(can_apply(RequestStatus::Draft, LifecycleEvent::Submit));
        assert!(can_apply(RequestStatus::Draft, LifecycleEvent::Delete));
    }

    #[test]
    fn pending_allows_approve_reject_cancel() {
        assert!(can_apply(RequestStatus::Pending, LifecycleEvent::Approve));
        assert!(can_apply(RequestStatus::Pending, LifecycleEvent::Reject));
        assert!(can_apply(RequestStatus::Pending, LifecycleEvent::Cancel));
    }

    #[test]
    fn approved_allows_only_cancel() {
        assert_eq!(
            valid_events(RequestStatus::Approved),
            &[LifecycleEvent::Cancel]
        );
    }

    #[test]
    fn terminal_states_allow_nothing() {
        assert!(valid_events(RequestStatus::Rejected).is_empty());
        assert!(valid_events(RequestStatus::Cancelled).is_empty());
    }

    /// Every (status, event) pair outside the transition table must fail
    /// with `InvalidTransition` naming the offending pair.
    #[test]
    fn exhaustive_rejection_of_off_table_pairs() {
        for status in ALL_STATUSES {
            for event in ALL_EVENTS {
                let legal = valid_events(status).contains(&event);
                let result = validate_transition(status, event);
                if legal {
                    assert!(result.is_ok(), "{status} + {event} should be legal");
                } else {
                    match result {
                        Err(CoreError::InvalidTransition { from, event: ev }) => {
                            assert_eq!(from, status);
                            assert_eq!(ev, event);
                        }
                        other => panic!("{status} + {event}: expected InvalidTransition, got {other:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn status_ids_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(RequestStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(RequestStatus::from_id(0), None);
        assert_eq!(RequestStatus::from_id(6), None);
    }

    #[test]
    fn only_pending_and_approved_commit_allowance() {
        assert!(commits_allowance(RequestStatus::Pending));
        assert!(commits_allowance(RequestStatus::Approved));
        assert!(!commits_allowance(RequestStatus::Draft));
        assert!(!commits_allowance(RequestStatus::Rejected));
        assert!(!commits_allowance(RequestStatus::Cancelled));
    }

    #[test]
    fn target_statuses() {
        assert_eq!(
            target_status(LifecycleEvent::Submit),
            Some(RequestStatus::Pending)
        );
        assert_eq!(
            target_status(LifecycleEvent::Approve),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            target_status(LifecycleEvent::Reject),
            Some(RequestStatus::Rejected)
        );
        assert_eq!(
            target_status(LifecycleEvent::Cancel),
            Some(RequestStatus::Cancelled)
        );
        assert_eq!(target_status(LifecycleEvent::Delete), None);
    }
}
