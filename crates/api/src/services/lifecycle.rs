//! Owner-side lifecycle operations: create, edit, submit, delete.
//!
//! Submit is the ledger-coupling point: it reserves the request's day
//! total against the owner's allowance in the same transaction that
//! moves the request to Pending.

use leavedesk_core::actor::Actor;
use leavedesk_core::error::CoreError;
use leavedesk_core::ledger;
use leavedesk_core::lifecycle::{self, LifecycleEvent, RequestStatus};
use leavedesk_core::period::{self, PeriodInput, VacationPeriod};
use leavedesk_core::types::DbId;
use leavedesk_db::models::request::{CreateRequest, RequestWithPeriods};
use leavedesk_db::repositories::{LimitRepo, RequestRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Create a new Draft request for its owner.
pub async fn create(
    pool: &PgPool,
    actor: &Actor,
    owner_id: DbId,
    year: i32,
    periods: &[PeriodInput],
    comment: Option<String>,
) -> AppResult<RequestWithPeriods> {
    actor.require_owner(owner_id)?;
    let periods = period::validate_periods(year, periods)?;

    let input = CreateRequest {
        owner_id,
        year,
        comment,
        periods,
    };
    let created = RequestRepo::create(pool, &input).await?;
    tracing::info!(
        request_id = created.request.id,
        owner_id,
        year,
        "Vacation request created"
    );
    Ok(created)
}

/// Replace a Draft request's periods and comment.
pub async fn edit(
    pool: &PgPool,
    actor: &Actor,
    request_id: DbId,
    periods: &[PeriodInput],
    comment: Option<String>,
) -> AppResult<RequestWithPeriods> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_owner(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Edit)?;

    let validated = period::validate_periods(request.year, periods)?;
    RequestRepo::replace_periods(&mut *tx, request_id, &validated, comment.as_deref()).await?;

    tx.commit().await?;

    fetch_after_commit(pool, request_id).await
}

/// Submit a Draft request for approval: Draft -> Pending, reserving
/// `sum(day_count)` against the owner's allowance.
///
/// Runs the per-request row lock plus the per-(owner, year) ledger row
/// lock in one transaction. Submission never forces the allowance.
pub async fn submit(pool: &PgPool, actor: &Actor, request_id: DbId) -> AppResult<RequestWithPeriods> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_owner(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Submit)?;

    let periods: Vec<VacationPeriod> = RequestRepo::periods_for(&mut *tx, request_id)
        .await?
        .iter()
        .map(VacationPeriod::from)
        .collect();
    period::validate_for_submit(&periods)?;
    let requested = period::total_days(&periods);

    let limit = LimitRepo::lock_or_insert(&mut *tx, request.owner_id, request.year).await?;
    ledger::check_reserve(limit.summary(), requested, false)?;
    LimitRepo::reserve(&mut *tx, limit.id, requested).await?;

    RequestRepo::set_status(&mut *tx, request_id, RequestStatus::Pending).await?;

    tx.commit().await?;
    tracing::info!(
        request_id,
        owner_id = request.owner_id,
        days = requested,
        "Request submitted, days reserved"
    );

    fetch_after_commit(pool, request_id).await
}

/// Delete a Draft request outright. Drafts never reserved days, so the
/// ledger is untouched.
pub async fn delete(pool: &PgPool, actor: &Actor, request_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let request = RequestRepo::find_for_update(&mut *tx, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "VacationRequest",
            id: request_id,
        })?;

    actor.require_owner(request.owner_id)?;
    lifecycle::validate_transition(request.lifecycle_status()?, LifecycleEvent::Delete)?;

    RequestRepo::delete(&mut *tx, request_id).await?;

    tx.commit().await?;
    tracing::info!(request_id, owner_id = request.owner_id, "Draft request deleted");
    Ok(())
}

/// Re-read a request after its transaction committed, for the response
/// payload.
pub(crate) async fn fetch_after_commit(
    pool: &PgPool,
    request_id: DbId,
) -> AppResult<RequestWithPeriods> {
    RequestRepo::find_with_periods(pool, request_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "VacationRequest",
                id: request_id,
            })
        })
}
