//! Approver-side coordination: approve, reject, cancel.
//!
//! Approval is the check-then-act critical section: the conflict
//! snapshot and the Pending -> Approved commit must be atomic, otherwise
//! a second approver could approve an overlapping request between the
//! check and the commit. A transaction-scoped advisory lock keyed on the
//! request's year serializes approvals across the scope; the request row
//! lock serializes transitions per request.

use leavedesk_core::actor::Actor;
use leavedesk_core::conflict::{self, ConflictRecord, ScopedPeriod};
use leavedesk_core::error::CoreError;
use leavedesk_core::lifecycle::{self, LifecycleEvent, RequestStatus};
use leavedesk_core::period::{self, VacationPeriod};
use leavedesk_core::types::DbId;
use leavedesk_db::models::request::RequestWithPeriods;
use leavedesk_db::repositories::{LimitRepo, RequestRepo};
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;
use crate::services::lifecycle::fetch_after_commit;

/// Advisory lock class for approval critical sections. The second lock
/// key is the request's year.
const APPROVAL_LOCK_CLASS: i32 = 0x1EA5E;

/// Result of a successful approval.
#[derive(Debug)]
pub struct ApprovalOutcome {
    pub request: RequestWithPeriods,
    /// Conflicts that were overridden by `force`. Empty when the
    /// approval was clean. Surfacing these makes the override auditable.
    pub warnings: Vec<ConflictRecord>,
}

/// Approve a Pending request.
///
/// With conflicts and `force == false`, fails with
/// [`CoreError::Conflict`] carrying every conflicting pair; no state or
/// ledger change. With `force == true` the approval proceeds and the
/// same records are returned as warnings. The reservation made at submit
/// stays in place, so the ledger needs no call here.
pub async fn approve(
    pool: &PgPool,
    actor: &Actor,
    request_id: DbId,
    force: bool,
) -> AppResult<ApprovalOutcome> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_scope(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Approve)?;

    // Scope-wide critical section: no other approval in this year may
    // interleave between the conflict snapshot and the commit below.
    acquire_approval_lock(&mut *tx, request.year).await?;

    let candidates: Vec<VacationPeriod> = RequestRepo::periods_for(&mut *tx, request_id)
        .await?
        .iter()
        .map(VacationPeriod::from)
        .collect();

    let scope_ids: Vec<DbId> = actor.scope.iter().copied().collect();
    let existing: Vec<ScopedPeriod> =
        RequestRepo::approved_periods_in_scope(&mut *tx, &scope_ids, request.year, request_id)
            .await?
            .iter()
            .map(ScopedPeriod::from)
            .collect();

    let conflicts = conflict::detect_conflicts(request_id, request.owner_id, &candidates, &existing);

    if !conflicts.is_empty() && !force {
        // Rolls back on drop: no state change, no ledger change.
        return Err(CoreError::Conflict(conflicts).into());
    }

    RequestRepo::set_decision(&mut *tx, request_id, RequestStatus::Approved, actor.id, None).await?;

    tx.commit().await?;

    if conflicts.is_empty() {
        tracing::info!(request_id, approver_id = actor.id, "Request approved");
    } else {
        tracing::warn!(
            request_id,
            approver_id = actor.id,
            overridden_conflicts = conflicts.len(),
            "Request force-approved over conflicts"
        );
    }

    Ok(ApprovalOutcome {
        request: fetch_after_commit(pool, request_id).await?,
        warnings: conflicts,
    })
}

/// Reject a Pending request, releasing its reservation.
///
/// The reason may be an empty string; it is recorded verbatim.
pub async fn reject(
    pool: &PgPool,
    actor: &Actor,
    request_id: DbId,
    reason: &str,
) -> AppResult<RequestWithPeriods> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_scope(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Reject)?;

    release_reservation(&mut *tx, &request).await?;
    RequestRepo::set_decision(
        &mut *tx,
        request_id,
        RequestStatus::Rejected,
        actor.id,
        Some(reason),
    )
    .await?;

    tx.commit().await?;
    tracing::info!(request_id, approver_id = actor.id, "Request rejected");

    fetch_after_commit(pool, request_id).await
}

/// Cancel a Pending or Approved request, releasing its reservation.
/// Permitted to the owner or any approver with scope over the owner.
pub async fn cancel(pool: &PgPool, actor: &Actor, request_id: DbId) -> AppResult<RequestWithPeriods> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_owner_or_scope(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Cancel)?;

    release_reservation(&mut *tx, &request).await?;
    RequestRepo::set_status(&mut *tx, request_id, RequestStatus::Cancelled).await?;

    tx.commit().await?;
    tracing::info!(request_id, actor_id = actor.id, "Request cancelled");

    fetch_after_commit(pool, request_id).await
}

async fn acquire_approval_lock(conn: &mut PgConnection, year: i32) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(APPROVAL_LOCK_CLASS)
        .bind(year)
        .execute(conn)
        .await?;
    Ok(())
}

/// Release the request's reserved days back to its owner's ledger.
///
/// Only Pending and Approved requests hold a reservation; the transition
/// table guarantees reject/cancel only run from those states, so this is
/// exactly one release per reservation.
async fn release_reservation(
    conn: &mut PgConnection,
    request: &leavedesk_db::models::request::VacationRequest,
) -> AppResult<()> {
    let periods: Vec<VacationPeriod> = RequestRepo::periods_for(&mut *conn, request.id)
        .await?
        .iter()
        .map(VacationPeriod::from)
        .collect();
    let days = period::total_days(&periods);

    let limit = LimitRepo::lock_or_insert(&mut *conn, request.owner_id, request.year).await?;
    LimitRepo::release(&mut *conn, limit.id, days).await?;
    Ok(())
}
